use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use material_table::aggregate::Aggregator;
use material_table::projection::project;
use material_table::writer::write_csv_to_writer;

fn material(i: usize) -> Value {
    json!({
        "name": {"translate": format!("material.silentgear.material_{i}")},
        "availability": {"tier": i % 5, "categories": ["metal", "precious", "extra"]},
        "crafting_items": {"main": {"tag": "forge:ingots/iron"}},
        "stats": {
            "main": {"durability": 250, "rarity": 20, "harvest_speed": 6.0, "armor/helmet": 2},
            "rod": {"durability": {"mul2": 0.1}, "ranged_damage": {"mul2": 1.1}, "rarity": 5}
        },
        "traits": {
            "main": [
                {"name": "silentgear:magnetic", "level": 1},
                {"name": "silentgear:malleable", "level": 2},
                {"name": "silentgear:soft", "level": 3},
                {"name": "silentgear:lustrous", "level": 1}
            ],
            "rod": [{"name": "silentgear:flexible", "level": 1}]
        }
    })
}

fn bench_projection(c: &mut Criterion) {
    let item = material(0);
    c.bench_function("project_single_item", |b| {
        b.iter(|| project(black_box(&item)).unwrap())
    });

    let doc = Value::Array((0..1_000).map(material).collect());
    c.bench_function("aggregate_and_write_1k_items", |b| {
        b.iter(|| {
            let mut agg = Aggregator::default();
            agg.push_tree(std::path::Path::new("bench.json"), black_box(&doc));
            let mut out = Vec::with_capacity(256 * 1024);
            write_csv_to_writer(&mut out, agg.records()).unwrap();
            out
        })
    });
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);

//! Benchmarks for schema flattening and change resolution
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fieldmap_sdk::{DynamicSchema, FieldNode, FlattenedSchema, Mapper, MappingRule, SchemaOptions};

/// `records` composites of `width` leaves each, plus one top-level leaf per record
fn wide_declaration(records: usize, width: usize) -> Vec<FieldNode> {
    (0..records)
        .flat_map(|r| {
            let members = (0..width)
                .map(|w| FieldNode::leaf(format!("F{}", w)).with_tag("json", format!("f{}", w)))
                .collect();
            [
                FieldNode::leaf(format!("Leaf{}", r)).with_tag("json", format!("leaf{}", r)),
                FieldNode::composite(format!("Record{}", r), members)
                    .with_tag("json", format!("record{}", r)),
            ]
        })
        .collect()
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    let options = SchemaOptions::new().with_required_tag("json");

    for records in [10usize, 100, 1000].iter() {
        let nodes = wide_declaration(*records, 8);
        group.throughput(Throughput::Elements((*records * 10) as u64));
        group.bench_with_input(BenchmarkId::new("records", records), &nodes, |b, nodes| {
            b.iter(|| {
                let schema =
                    FlattenedSchema::<DynamicSchema>::from_nodes(black_box(nodes), &options);
                black_box(schema)
            })
        });
    }

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let options = SchemaOptions::new();

    for records in [10usize, 100, 1000].iter() {
        let src = FlattenedSchema::<DynamicSchema>::from_nodes(&wide_declaration(*records, 8), &options)
            .expect("valid source declaration");
        let dst = FlattenedSchema::<DynamicSchema>::from_nodes(&wide_declaration(4, 4), &options)
            .expect("valid destination declaration");

        // Rules only on composites, so every nested leaf resolves through its parent
        let targets: Vec<_> = dst.field_ids().collect();
        let rules: Vec<_> = src
            .field_ids()
            .filter(|&f| src.is_composite(f))
            .enumerate()
            .map(|(i, f)| MappingRule::new(f, [targets[i % targets.len()]]))
            .collect();
        let mapper = Mapper::compile(&src, &dst, rules).expect("valid rules");
        let changed: Vec<_> = src.field_ids().collect();

        group.throughput(Throughput::Elements(changed.len() as u64));
        group.bench_with_input(BenchmarkId::new("all_fields", records), &changed, |b, changed| {
            b.iter(|| black_box(mapper.resolve(changed.iter().copied())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_resolve);
criterion_main!(benches);

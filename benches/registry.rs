use std::io::Cursor;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use zpgen::parser::zfin::ZfinRecords;
use zpgen::{CompositionBuilder, Generator, IdentityRegistry, Ontology, RawRecord};

const ENTITIES: [&str; 8] = [
    "ZFA:0001086",
    "ZFA:0001161",
    "ZFA:0000107",
    "ZFA:0000037",
    "ZFA:0001514",
    "ZFA:0000152",
    "GO:0007601",
    "BSPO:0000084",
];

const QUALITIES: [&str; 4] = [
    "PATO:0000070",
    "PATO:0000117",
    "PATO:0000587",
    "PATO:0000628",
];

fn records() -> Vec<RawRecord> {
    let mut records = Vec::new();
    for (i, e1) in ENTITIES.iter().enumerate() {
        for sub in ENTITIES.iter() {
            for quality in QUALITIES.iter() {
                records.push(
                    RawRecord::builder(&format!("ZDB-GENE-{}", i))
                        .entity1(e1, "entity")
                        .entity1_subterm(sub, "subterm")
                        .quality(quality, "quality")
                        .entity2(ENTITIES[(i + 1) % ENTITIES.len()], "other")
                        .abnormal(true)
                        .build(),
                );
            }
        }
    }
    records
}

fn zfin_file(records: &[RawRecord]) -> String {
    let mut content = String::new();
    for record in records {
        let e1 = record.entity1();
        let e2 = record.entity2();
        content.push_str(&format!(
            "{}\t1\t1\tsym\t{}\tsubterm\t\t\t{}\tentity\t\
             {}\tquality\tabnormal\t\t\t\t\t{}\tother\n",
            record.gene_id(),
            e1.subterm().map(|t| t.id()).unwrap_or_default(),
            e1.superterm().map(|t| t.id()).unwrap_or_default(),
            record.quality().id(),
            e2.superterm().map(|t| t.id()).unwrap_or_default(),
        ));
    }
    content
}

fn compose_and_resolve(c: &mut Criterion) {
    let records = records();
    let builder = CompositionBuilder;
    c.bench_function("compose and resolve", |b| {
        b.iter(|| {
            let mut registry = IdentityRegistry::default();
            for record in &records {
                if let Some(mut term) = builder.compose(black_box(record)).expect("valid record") {
                    term.resolve_id(&mut registry);
                }
            }
            registry.len()
        })
    });
}

fn full_run(c: &mut Criterion) {
    let content = zfin_file(&records());
    c.bench_function("generate ontology", |b| {
        b.iter(|| {
            let mut generator = Generator::new(
                Ontology::default(),
                IdentityRegistry::default(),
                std::io::sink(),
                true,
            );
            generator.process_root().expect("root is valid");
            generator
                .process_all(ZfinRecords::new(Cursor::new(black_box(content.as_bytes()))))
                .expect("valid records");
            let mut output = Vec::new();
            generator.ontology().write(&mut output).expect("writing to memory");
            output.len()
        })
    });
}

fn reload_ontology(c: &mut Criterion) {
    let mut generator = Generator::new(
        Ontology::default(),
        IdentityRegistry::default(),
        std::io::sink(),
        true,
    );
    generator
        .process_all(records().into_iter().map(Ok))
        .expect("valid records");
    let mut output = Vec::new();
    generator.ontology().write(&mut output).expect("writing to memory");
    let document = String::from_utf8(output).expect("valid utf-8");

    c.bench_function("reload ontology", |b| {
        b.iter(|| {
            let ontology = Ontology::parse(black_box(&document)).expect("valid ontology");
            IdentityRegistry::from_ontology(&ontology).len()
        })
    });
}

criterion_group! {
    name = registry;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = compose_and_resolve, full_run, reload_ontology
}
criterion_main!(registry);

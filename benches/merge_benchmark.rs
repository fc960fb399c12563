//! Merge stage throughput: reshaping detail tables and joining summaries

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use handset_scraper::application::merge;
use handset_scraper::domain::product::{ContractType, ProductSummary, format_reviews};
use handset_scraper::domain::spec_table::{DetailTable, RawTable};

const SPEC_ROWS: &[&str] = &[
    "Screen size",
    "Resolution",
    "Battery",
    "Weight",
    "Rear camera",
    "Front camera",
    "Storage",
    "Operating system",
    "5G ready",
    "Colours",
];

fn catalog(products: usize) -> (Vec<ProductSummary>, Vec<DetailTable>) {
    let summaries = (0..products)
        .map(|i| ProductSummary {
            brand: format!("Brand {}", i % 7),
            model: format!("Model {i}"),
            upfront_cost: "£30.00".to_string(),
            monthly_price: "41.99".to_string(),
            link: format!("https://www.o2.co.uk/shop/phone-{i}"),
            rating: 4.5,
            reviews: format_reviews("100"),
            contract_type: if i % 2 == 0 { ContractType::PayMonthly } else { ContractType::PayAsYouGo },
        })
        .collect();

    let details = (0..products)
        .map(|i| DetailTable {
            link: format!("https://www.o2.co.uk/shop/phone-{i}"),
            table: RawTable::new(
                SPEC_ROWS
                    .iter()
                    // Every third phone repeats a spec name
                    .chain(if i % 3 == 0 { &SPEC_ROWS[..1] } else { &[][..] })
                    .map(|name| vec![name.to_string(), format!("{name} of phone {i}")])
                    .collect(),
            ),
        })
        .collect();

    (summaries, details)
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for products in [50usize, 200, 800] {
        let (summaries, details) = catalog(products);
        group.bench_with_input(BenchmarkId::from_parameter(products), &products, |b, _| {
            b.iter(|| merge(black_box(&summaries), black_box(&details)))
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let (summaries, details) = catalog(200);
    let dataset = match merge(&summaries, &details) {
        Ok(dataset) => dataset,
        Err(e) => panic!("merge failed: {e}"),
    };
    c.bench_function("serialize_200", |b| b.iter(|| black_box(&dataset).to_json_bytes()));
}

criterion_group!(benches, bench_merge, bench_serialize);
criterion_main!(benches);

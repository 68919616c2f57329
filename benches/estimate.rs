use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use carprice::features::{stack, CarListing};
use carprice::inference::{EstimatorConfig, PriceEstimator};
use std::path::Path;

fn load_estimator() -> PriceEstimator {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("artifacts");
    PriceEstimator::load(dir, EstimatorConfig::default()).unwrap()
}

fn create_listings(n: usize) -> Vec<CarListing> {
    let brands = [("Dacia", "Logan"), ("Renault", "Clio"), ("Peugeot", "208"), ("Toyota", "Yaris")];
    let cities = ["Casablanca", "Rabat", "Marrakech", "Tanger"];
    let fuels = ["Diesel", "Essence", "Hybride"];

    (0..n)
        .map(|i| {
            let (marque, modele) = brands[i % brands.len()];
            CarListing {
                marque: marque.to_string(),
                modele: modele.to_string(),
                annee_modele: 2000 + (i % 25) as i32,
                kilometrage: ((i * 7_919) % 400_000) as i64,
                nombre_de_portes: 5,
                puissance_fiscale: 4 + (i % 8) as i32,
                premiere_main: (i % 2) as i32,
                boite_vitesses: if i % 3 == 0 { "Automatique" } else { "Manuelle" }.to_string(),
                type_de_carburant: fuels[i % fuels.len()].to_string(),
                origine: "WW au Maroc".to_string(),
                etat_du_vehicule: "Très bon".to_string(),
                localisation: cities[i % cities.len()].to_string(),
            }
        })
        .collect()
}

fn bench_single(c: &mut Criterion) {
    let estimator = load_estimator();
    let listing = create_listings(1).remove(0);

    let mut group = c.benchmark_group("single");
    group.bench_function("encode", |b| {
        b.iter(|| estimator.encode(black_box(&listing)).unwrap())
    });
    group.bench_function("estimate", |b| {
        b.iter(|| estimator.estimate(black_box(&listing)).unwrap())
    });
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let estimator = load_estimator();
    let mut group = c.benchmark_group("batch");

    for n in [100, 1000].iter() {
        let listings = create_listings(*n);

        group.bench_with_input(BenchmarkId::new("estimate_batch", n), &listings, |b, listings| {
            b.iter(|| estimator.estimate_batch(black_box(listings)))
        });

        let rows: Vec<_> = listings.iter().map(|l| estimator.encode(l).unwrap()).collect();
        let x = stack(&rows).unwrap();
        group.bench_with_input(BenchmarkId::new("predict_batch", n), &x, |b, x| {
            b.iter(|| estimator.model().predict_batch(black_box(x)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);

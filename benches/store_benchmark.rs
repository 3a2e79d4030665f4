use std::path::Path;

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use phonevault::codec::{self, PhoneBook};
use phonevault::{EncryptionKey, Store, StoreConfig};

const KEY: [u8; 16] = [0x42; 16];

fn book_with(contacts: usize) -> PhoneBook {
    let mut book = PhoneBook::new();
    for i in 0..contacts {
        book.insert(&format!("Contact {i:05}"), &format!("+1 555 {i:07}"))
            .unwrap();
    }
    book
}

// A fresh store per iteration keeps the in-memory journal from growing
// across criterion's samples.
fn fresh_store(path: &Path) -> Store {
    Store::new(StoreConfig::new(path, EncryptionKey::from_bytes(KEY)))
}

fn benchmark_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.bin");

    for contacts in [10, 1_000, 10_000] {
        let book = book_with(contacts);
        group.throughput(Throughput::Bytes(codec::encode(&book).len() as u64));

        group.bench_with_input(BenchmarkId::new("save", contacts), &book, |b, book| {
            b.iter_batched(
                || fresh_store(&path),
                |mut store| store.save(black_box(book)).unwrap(),
                BatchSize::SmallInput,
            );
        });

        fresh_store(&path).save(&book).unwrap();
        group.bench_with_input(BenchmarkId::new("load", contacts), &contacts, |b, _| {
            b.iter_batched(
                || fresh_store(&path),
                |mut store| black_box(store.load().unwrap()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_store);
criterion_main!(benches);

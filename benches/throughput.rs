use chatwave_proto::{reply, Command};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

// Benchmarks the per-line protocol overhead: command parsing and reply
// formatting. Routing itself is dominated by queue handoff and is
// covered by the integration tests instead.

fn command_parsing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    let raw = "MSG bob the quick brown fox jumps over the lazy dog";
    group.throughput(Throughput::Bytes(raw.len() as u64));

    group.bench_function("parse_msg", |b| {
        b.iter(|| Command::parse(raw).unwrap())
    });

    group.bench_function("parse_create_group", |b| {
        b.iter(|| Command::parse("CREATE_GROUP team bob,carol,dave,erin").unwrap())
    });

    group.finish();
}

fn reply_formatting_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    group.bench_function("private_notification", |b| {
        b.iter(|| reply::private_from("alice", "the quick brown fox"))
    });

    group.bench_function("group_notification", |b| {
        b.iter(|| reply::group_from("team", "alice", "the quick brown fox"))
    });

    group.finish();
}

criterion_group!(benches, command_parsing_benchmark, reply_formatting_benchmark);
criterion_main!(benches);

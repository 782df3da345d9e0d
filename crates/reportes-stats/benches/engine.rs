use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use reportes_core::model::Ticket;
use reportes_stats::TicketSet;
use reportes_stats::engine::SummaryOptions;

const TIERS: [(&str, usize); 3] = [("small", 500), ("medium", 5_000), ("large", 50_000)];

const OFFICES: [&str; 8] = [
    "Legal",
    "RRHH",
    "Compras",
    "Sistemas",
    "Archivo",
    "Mesa de Entradas",
    "Contaduria",
    "Tesoreria",
];

const STAFF: [&str; 6] = ["Tomas", "Norela", "Nahuel", "Adrian", "Marcelo", "Chloe"];

fn synthetic_tickets(count: usize) -> Vec<Ticket> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();
    (0..count)
        .map(|i| {
            let day = start + chrono::Duration::days((i % 700) as i64);
            let status = match i % 3 {
                0 => "pending",
                1 => "in_progress",
                _ => "resolved",
            };
            let resolved_by = if status == "resolved" {
                format!("{}, {}", STAFF[i % STAFF.len()], STAFF[(i / 7) % STAFF.len()])
            } else {
                String::new()
            };
            let date = if i % 5 == 0 {
                day.format("%Y-%m-%d").to_string()
            } else {
                day.format("%d/%m/%y").to_string()
            };
            Ticket {
                id: i as i64 + 1,
                floor: (i % 9) as i64 - 2,
                office: OFFICES[i % OFFICES.len()].to_string(),
                reporter: "Ana".to_string(),
                reason: "Synthetic".to_string(),
                status: status.to_string(),
                date,
                resolved_by,
            }
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine.tiered");

    for (name, count) in TIERS {
        let rows = synthetic_tickets(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("ingest", name), &rows, |b, rows| {
            b.iter(|| black_box(TicketSet::new(rows.iter().cloned())))
        });

        let set = TicketSet::new(rows);
        group.bench_with_input(BenchmarkId::new("summary", name), &set, |b, set| {
            b.iter(|| black_box(set.summary(SummaryOptions::default())))
        });

        group.bench_with_input(BenchmarkId::new("winners", name), &set, |b, set| {
            b.iter(|| black_box(set.top_winners()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine);
criterion_main!(benches);

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use chrono_tz::Asia::Almaty;

use lossdesk_core::{Amount, ManagerId, RestaurantId};
use lossdesk_incidents::{CloseMode, IncidentDraft, LossReason, local_time};

fn complete_draft() -> IncidentDraft {
    let mut draft = IncidentDraft::new();
    draft.set_manager(ManagerId::new(1), "Ivanov");
    draft.set_restaurant(RestaurantId::new(10), "Restaurant-1");
    draft.set_day(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    draft.set_start_hour(9);
    draft.set_start_minute(0);
    draft.set_close_mode(CloseMode::Now);
    draft.set_end_hour(10);
    draft.set_end_minute(30);
    draft.set_reason(LossReason::External);
    draft.set_comment("fridge down");
    draft.set_amount(Amount::new(50_000).unwrap());
    draft
}

fn bench_amount_parse(c: &mut Criterion) {
    c.bench_function("amount_parse_grouped", |b| {
        b.iter(|| Amount::parse(black_box("1 250 000")).unwrap())
    });
}

fn bench_combine(c: &mut Criterion) {
    let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    c.bench_function("local_time_combine", |b| {
        b.iter(|| local_time::combine(Almaty, black_box(day), 9, 30).unwrap())
    });
}

fn bench_record_build(c: &mut Criterion) {
    let draft = complete_draft();
    c.bench_function("draft_into_record", |b| {
        b.iter(|| black_box(&draft).into_record(Almaty).unwrap())
    });
}

criterion_group!(benches, bench_amount_parse, bench_combine, bench_record_build);
criterion_main!(benches);

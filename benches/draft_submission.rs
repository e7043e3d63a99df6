//! Benchmarks for draft validation and payload building.
//!
//! These measure the pure submit path: reducer transitions on a draft
//! followed by validation and wire payload construction.

use campaign_console::state::submit::{build_ab_test_request, build_campaign_request};
use campaign_console::state::{AbTestChange, AbTestDraft, CampaignChange, CampaignDraft, CampaignMode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn rotation_draft(steps: usize) -> CampaignDraft {
    let mut draft = CampaignDraft::default()
        .apply(CampaignChange::Name("bench".to_string()))
        .apply(CampaignChange::List("1".to_string()))
        .apply(CampaignChange::Mode(CampaignMode::Rotation))
        .apply(CampaignChange::ToggleAccount(1))
        .apply(CampaignChange::RotationStepTemplate {
            index: 0,
            template_id: "1".to_string(),
        });
    for i in 1..steps {
        draft = draft
            .apply(CampaignChange::AddRotationStep)
            .apply(CampaignChange::RotationStepTemplate {
                index: i,
                template_id: (i + 1).to_string(),
            })
            .apply(CampaignChange::RotationStepCount {
                index: i,
                raw: "5".to_string(),
            });
    }
    draft
}

fn bench_campaign_build(c: &mut Criterion) {
    let draft = rotation_draft(20);
    c.bench_function("build_campaign_request_20_steps", |b| {
        b.iter(|| build_campaign_request(black_box(&draft)))
    });
}

fn bench_draft_transitions(c: &mut Criterion) {
    c.bench_function("rotation_draft_transitions_20_steps", |b| {
        b.iter(|| rotation_draft(black_box(20)))
    });
}

fn bench_ab_test_build(c: &mut Criterion) {
    let draft = AbTestDraft::default()
        .apply(AbTestChange::Name("bench".to_string()))
        .apply(AbTestChange::VariantTemplate {
            index: 0,
            template_id: "1".to_string(),
        })
        .apply(AbTestChange::VariantTemplate {
            index: 1,
            template_id: "2".to_string(),
        });
    c.bench_function("build_ab_test_request", |b| {
        b.iter(|| build_ab_test_request(black_box(&draft)))
    });
}

criterion_group!(
    benches,
    bench_campaign_build,
    bench_draft_transitions,
    bench_ab_test_build
);
criterion_main!(benches);

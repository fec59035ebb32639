use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use simple_data_tool::execution::{ExecutionEngine, ExecutionOptions};
use simple_data_tool::ingestion::csv::read_records;
use simple_data_tool::model::{Claim, Customer, Policy};
use simple_data_tool::query::{
    count_open_claims_for_state, customer_with_highest_total_premium, most_spoken_secondary_language,
    total_premium_by_agent, Query,
};
use simple_data_tool::sources::Snapshot;

const STATES: [&str; 5] = ["TX", "AZ", "MT", "IL", "NJ"];
const LANGUAGES: [&str; 4] = ["Spanish", "German", "Navajo", "English"];

fn customers_csv(n: usize) -> String {
    let mut out = String::from("id,firstName,lastName,age,state,region,primaryLanguage,secondaryLanguage,agentId\n");
    for i in 0..n {
        out.push_str(&format!(
            "{i},First{i},Last{i},{},{},South,English,{},{}\n",
            20 + i % 50,
            STATES[i % STATES.len()],
            LANGUAGES[i % LANGUAGES.len()],
            i % 97
        ));
    }
    out
}

fn policies_csv(n: usize) -> String {
    let mut out = String::from("id,customerId,policyType,startDate,premiumPerMonth\n");
    for i in 0..n {
        out.push_str(&format!("{i},{},Auto,01/01/2020,{}.25\n", i / 3, 10 + i % 200));
    }
    out
}

fn claims_csv(n: usize) -> String {
    let mut out = String::from("id,policyId,isClaimOpen,claimType\n");
    for i in 0..n {
        out.push_str(&format!("{i},{},{},Hail\n", i / 2, i % 3 == 0));
    }
    out
}

fn snapshot(customers: usize) -> Snapshot {
    let customers_text = customers_csv(customers);
    let policies_text = policies_csv(customers * 3);
    let claims_text = claims_csv(customers * 6);

    Snapshot {
        agents: Vec::new(),
        customers: read_records::<Customer>(customers_text.as_bytes()).unwrap(),
        policies: read_records::<Policy>(policies_text.as_bytes()).unwrap(),
        claims: read_records::<Claim>(claims_text.as_bytes()).unwrap(),
    }
}

fn bench_decode(c: &mut Criterion) {
    let text = policies_csv(30_000);
    c.bench_function("decode_policies_30k", |b| {
        b.iter(|| read_records::<Policy>(black_box(text.as_bytes())).unwrap())
    });
}

fn bench_queries(c: &mut Criterion) {
    let snap = snapshot(10_000);

    c.bench_function("count_open_claims_for_state", |b| {
        b.iter(|| count_open_claims_for_state(&snap.customers, &snap.policies, &snap.claims, black_box("TX")))
    });
    c.bench_function("most_spoken_secondary_language", |b| {
        b.iter(|| most_spoken_secondary_language(&snap.customers, black_box("AZ"), "English"))
    });
    c.bench_function("customer_with_highest_total_premium", |b| {
        b.iter(|| customer_with_highest_total_premium(&snap.customers, &snap.policies).map(|c| c.id))
    });
    c.bench_function("total_premium_by_agent", |b| {
        b.iter(|| total_premium_by_agent(&snap.customers, &snap.policies))
    });
}

fn bench_batch(c: &mut Criterion) {
    let snap = snapshot(10_000);
    let engine = ExecutionEngine::new(ExecutionOptions::default());
    let queries: Vec<Query> = STATES
        .iter()
        .flat_map(|s| {
            [
                Query::CountOpenClaimsForState { state: s.to_string() },
                Query::MostSpokenSecondaryLanguage {
                    state: s.to_string(),
                    exclude: "English".to_string(),
                },
            ]
        })
        .chain([Query::TotalPremiumByAgent, Query::CustomerWithHighestTotalPremium])
        .collect();

    c.bench_function("run_batch_12_queries", |b| b.iter(|| engine.run_batch(&snap, black_box(&queries))));
}

criterion_group!(benches, bench_decode, bench_queries, bench_batch);
criterion_main!(benches);

//! Open-claim counts, directly and across customer/policy joins.

use std::collections::HashSet;

use crate::model::{Claim, Customer, Policy};

/// Number of claims that are still open.
pub fn count_open_claims(claims: &[Claim]) -> usize {
    claims.iter().filter(|c| c.is_claim_open).count()
}

/// Open claims on the policies of every customer named `first_name last_name`.
///
/// Returns `None` when no customer matches both names exactly, which is distinct from a
/// matching customer with zero open claims.
pub fn count_open_claims_for_customer_name(
    customers: &[Customer],
    policies: &[Policy],
    claims: &[Claim],
    first_name: &str,
    last_name: &str,
) -> Option<usize> {
    let customer_ids: HashSet<i64> = customers
        .iter()
        .filter(|c| c.first_name == first_name && c.last_name == last_name)
        .map(|c| c.id)
        .collect();
    if customer_ids.is_empty() {
        return None;
    }

    Some(count_open_claims_for_customers(&customer_ids, policies, claims))
}

/// Open claims on the policies of every customer living in `state`.
pub fn count_open_claims_for_state(
    customers: &[Customer],
    policies: &[Policy],
    claims: &[Claim],
    state: &str,
) -> usize {
    let customer_ids: HashSet<i64> = customers
        .iter()
        .filter(|c| c.state == state)
        .map(|c| c.id)
        .collect();

    count_open_claims_for_customers(&customer_ids, policies, claims)
}

// customer ids -> policy ids -> claims. Each claim is visited once, so a claim is never
// counted twice no matter how many policies a customer holds.
fn count_open_claims_for_customers(
    customer_ids: &HashSet<i64>,
    policies: &[Policy],
    claims: &[Claim],
) -> usize {
    let policy_ids: HashSet<i64> = policies
        .iter()
        .filter(|p| customer_ids.contains(&p.customer_id))
        .map(|p| p.id)
        .collect();

    claims
        .iter()
        .filter(|c| c.is_claim_open && policy_ids.contains(&c.policy_id))
        .count()
}

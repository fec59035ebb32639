//! Agent/customer head counts and language tallies.

use std::collections::HashMap;

use crate::model::{Agent, Customer};

/// Language left out of [`most_spoken_secondary_language`] tallies by default.
pub const DEFAULT_EXCLUDED_LANGUAGE: &str = "English";

/// Number of customers assigned to `agent_id`.
pub fn count_customers_for_agent(customers: &[Customer], agent_id: i64) -> usize {
    customers.iter().filter(|c| c.agent_id == agent_id).count()
}

/// Number of agents whose two-letter state code equals `state` (case-sensitive).
pub fn count_agents_for_state(agents: &[Agent], state: &str) -> usize {
    agents.iter().filter(|a| a.state == state).count()
}

/// Most spoken language among customers in `state`, not counting `exclude`.
///
/// Every non-empty primary and secondary language is tallied. Ties go to the language seen
/// first in input order (a row's primary language before its secondary). Returns `None` when
/// no language other than `exclude` is spoken in the state.
pub fn most_spoken_secondary_language(
    customers: &[Customer],
    state: &str,
    exclude: &str,
) -> Option<String> {
    // (language, tally) in first-seen order.
    let mut tallies: Vec<(&str, usize)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    let languages = customers
        .iter()
        .filter(|c| c.state == state)
        .flat_map(Customer::languages)
        .filter(|lang| *lang != exclude);
    for lang in languages {
        let slot = *slots.entry(lang).or_insert_with(|| {
            tallies.push((lang, 0));
            tallies.len() - 1
        });
        tallies[slot].1 += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for &(lang, tally) in &tallies {
        if best.is_none_or(|(_, top)| tally > top) {
            best = Some((lang, tally));
        }
    }
    best.map(|(lang, _)| lang.to_string())
}

//! Source file locations and path-driven queries.
//!
//! [`DataSources`] names the four extract files. Its query methods decode the files they need on
//! every call and run the matching function from [`crate::query`], so results always reflect the
//! current file contents and nothing is cached between calls. Use [`DataSources::load`] once and
//! query the returned [`Snapshot`] when many queries run over the same data.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::IngestionResult;
use crate::ingestion::{ingest_records, IngestionOptions};
use crate::model::{Agent, Claim, Customer, Policy};
use crate::query;

/// Default file names used by [`DataSources::in_dir`].
pub const AGENTS_FILE: &str = "agents.csv";
pub const CUSTOMERS_FILE: &str = "customers.csv";
pub const POLICIES_FILE: &str = "policies.csv";
pub const CLAIMS_FILE: &str = "claims.csv";

/// Paths of the four extract files.
///
/// Deserializes from a JSON object such as
/// `{"agents": "data/agents.csv", "customers": "...", "policies": "...", "claims": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    pub agents: PathBuf,
    pub customers: PathBuf,
    pub policies: PathBuf,
    pub claims: PathBuf,
    #[serde(skip)]
    options: IngestionOptionsSlot,
}

// `IngestionOptions` holds a trait object, so it is kept out of the serialized form and out of
// equality.
#[derive(Debug, Clone, Default)]
struct IngestionOptionsSlot(IngestionOptions);

impl PartialEq for IngestionOptionsSlot {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for IngestionOptionsSlot {}

/// One decoded, read-only view of all four collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub agents: Vec<Agent>,
    pub customers: Vec<Customer>,
    pub policies: Vec<Policy>,
    pub claims: Vec<Claim>,
}

impl DataSources {
    /// Sources with explicit paths.
    pub fn new(
        agents: impl Into<PathBuf>,
        customers: impl Into<PathBuf>,
        policies: impl Into<PathBuf>,
        claims: impl Into<PathBuf>,
    ) -> Self {
        Self {
            agents: agents.into(),
            customers: customers.into(),
            policies: policies.into(),
            claims: claims.into(),
            options: IngestionOptionsSlot::default(),
        }
    }

    /// Sources using the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join(AGENTS_FILE),
            dir.join(CUSTOMERS_FILE),
            dir.join(POLICIES_FILE),
            dir.join(CLAIMS_FILE),
        )
    }

    /// Read sources from a JSON config file. Relative paths are resolved against the config
    /// file's directory.
    pub fn from_json_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut sources: Self = serde_json::from_str(&text)?;
        if let Some(base) = path.parent() {
            for p in [
                &mut sources.agents,
                &mut sources.customers,
                &mut sources.policies,
                &mut sources.claims,
            ] {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        debug!("loaded data sources from {}: {sources:?}", path.display());
        Ok(sources)
    }

    /// Use `options` for every decode started from these sources.
    pub fn with_options(mut self, options: IngestionOptions) -> Self {
        self.options = IngestionOptionsSlot(options);
        self
    }

    /// Options used for every decode.
    pub fn options(&self) -> &IngestionOptions {
        &self.options.0
    }

    pub fn load_agents(&self) -> IngestionResult<Vec<Agent>> {
        ingest_records(&self.agents, self.options())
    }

    pub fn load_customers(&self) -> IngestionResult<Vec<Customer>> {
        ingest_records(&self.customers, self.options())
    }

    pub fn load_policies(&self) -> IngestionResult<Vec<Policy>> {
        ingest_records(&self.policies, self.options())
    }

    pub fn load_claims(&self) -> IngestionResult<Vec<Claim>> {
        ingest_records(&self.claims, self.options())
    }

    /// Decode all four files, sequentially. The first failure aborts the load.
    pub fn load(&self) -> IngestionResult<Snapshot> {
        Ok(Snapshot {
            agents: self.load_agents()?,
            customers: self.load_customers()?,
            policies: self.load_policies()?,
            claims: self.load_claims()?,
        })
    }

    pub fn count_open_claims(&self) -> IngestionResult<usize> {
        Ok(query::count_open_claims(&self.load_claims()?))
    }

    pub fn count_customers_for_agent(&self, agent_id: i64) -> IngestionResult<usize> {
        Ok(query::count_customers_for_agent(&self.load_customers()?, agent_id))
    }

    pub fn count_agents_for_state(&self, state: &str) -> IngestionResult<usize> {
        Ok(query::count_agents_for_state(&self.load_agents()?, state))
    }

    pub fn sum_monthly_premium_for_customer(&self, customer_id: i64) -> IngestionResult<f64> {
        Ok(query::sum_monthly_premium_for_customer(&self.load_policies()?, customer_id))
    }

    /// `Ok(None)` when no customer has both names.
    pub fn count_open_claims_for_customer_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> IngestionResult<Option<usize>> {
        let customers = self.load_customers()?;
        let policies = self.load_policies()?;
        let claims = self.load_claims()?;
        Ok(query::count_open_claims_for_customer_name(
            &customers, &policies, &claims, first_name, last_name,
        ))
    }

    /// Excludes [`query::DEFAULT_EXCLUDED_LANGUAGE`].
    pub fn most_spoken_secondary_language(&self, state: &str) -> IngestionResult<Option<String>> {
        self.most_spoken_language_excluding(state, query::DEFAULT_EXCLUDED_LANGUAGE)
    }

    pub fn most_spoken_language_excluding(
        &self,
        state: &str,
        exclude: &str,
    ) -> IngestionResult<Option<String>> {
        Ok(query::most_spoken_secondary_language(&self.load_customers()?, state, exclude))
    }

    pub fn customer_with_highest_total_premium(&self) -> IngestionResult<Option<Customer>> {
        let customers = self.load_customers()?;
        let policies = self.load_policies()?;
        Ok(query::customer_with_highest_total_premium(&customers, &policies).cloned())
    }

    pub fn count_open_claims_for_state(&self, state: &str) -> IngestionResult<usize> {
        let customers = self.load_customers()?;
        let policies = self.load_policies()?;
        let claims = self.load_claims()?;
        Ok(query::count_open_claims_for_state(&customers, &policies, &claims, state))
    }

    pub fn total_premium_by_agent(&self) -> IngestionResult<BTreeMap<i64, f64>> {
        let customers = self.load_customers()?;
        let policies = self.load_policies()?;
        Ok(query::total_premium_by_agent(&customers, &policies))
    }
}

impl Snapshot {
    /// Total number of decoded entities across all collections.
    pub fn entity_count(&self) -> usize {
        self.agents.len() + self.customers.len() + self.policies.len() + self.claims.len()
    }
}

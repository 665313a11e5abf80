//! HttpDriver for SPARQL 1.1 protocol endpoints
//!
//! Queries go to `{store}/query` as `query=...`, updates to `{store}/update`
//! as `update=...`, both form-encoded POSTs with one blocking request per call.

use indexmap::IndexMap;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::DatasetProperties;
use crate::drivers::results::{Row, SparqlResults};
use crate::drivers::traits::QueryExecutor;
use crate::errors::{OntologyError, Result};
use crate::query::{standard_prefixes, AskQuery, Bindings, InsertQuery, ParameterizedStatement, SelectQuery};

/// Accept header sent with ASK and SELECT requests
pub const SPARQL_RESULTS_ACCEPT: &str = "application/sparql-results+json,*/*;q=0.9";

/// Blocking HTTP executor for one dataset
#[derive(Debug, Clone)]
pub struct HttpDriver {
    store_url: String,
    client: Client,
    default_prefixes: IndexMap<String, String>,
}

impl HttpDriver {
    /// Create a driver for the dataset at `store_url`
    ///
    /// # Example
    ///
    /// ```
    /// use owlq_core::drivers::HttpDriver;
    /// use std::time::Duration;
    ///
    /// let driver = HttpDriver::new("http://localhost:3030/mci/", Duration::from_secs(30)).unwrap();
    /// assert_eq!(driver.query_endpoint(), "http://localhost:3030/mci/query");
    /// ```
    pub fn new(store_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| OntologyError::Transport {
                context: "building HTTP client".to_string(),
                source: e,
            })?;

        Ok(Self {
            store_url: store_url.trim_end_matches('/').to_string(),
            client,
            default_prefixes: standard_prefixes(),
        })
    }

    /// Driver for a configured dataset, with the dataset prefix among the defaults
    pub fn from_config(props: &DatasetProperties) -> Result<Self> {
        Ok(Self::new(&props.store_url, props.timeout())?.with_default_prefixes(props.default_prefixes()))
    }

    /// Replace the fixed prefix table every statement starts from
    pub fn with_default_prefixes(mut self, prefixes: IndexMap<String, String>) -> Self {
        self.default_prefixes = prefixes;
        self
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    pub fn query_endpoint(&self) -> String {
        format!("{}/query", self.store_url)
    }

    pub fn update_endpoint(&self) -> String {
        format!("{}/update", self.store_url)
    }

    /// Final SPARQL text of a built query: default and query prefixes, values substituted
    pub fn compile(
        &self,
        command: &str,
        prefixes: &IndexMap<String, String>,
        bindings: &Bindings,
    ) -> Result<String> {
        ParameterizedStatement::new(command, &self.default_prefixes)
            .with_prefixes(prefixes)
            .bind(bindings)
            .compile()
    }

    fn post_query(&self, kind: &str, text: &str) -> Result<String> {
        let endpoint = self.query_endpoint();
        debug!("{} query:\n{}", kind, text);

        let started = Instant::now();
        let response = self
            .client
            .post(&endpoint)
            .header(ACCEPT, SPARQL_RESULTS_ACCEPT)
            .form(&[("query", text)])
            .send()
            .map_err(|e| transport(kind, e))?;
        let response = check_status(response)?;
        let body = response.text().map_err(|e| transport(kind, e))?;

        info!("{} on {} took {:?}", kind, endpoint, started.elapsed());
        Ok(body)
    }

    fn post_update(&self, text: &str) -> Result<()> {
        let endpoint = self.update_endpoint();
        debug!("INSERT update:\n{}", text);

        let started = Instant::now();
        let response = self
            .client
            .post(&endpoint)
            .form(&[("update", text)])
            .send()
            .map_err(|e| transport("INSERT", e))?;
        check_status(response)?;

        info!("INSERT on {} took {:?}", endpoint, started.elapsed());
        Ok(())
    }
}

impl QueryExecutor for HttpDriver {
    fn ask(&self, query: &AskQuery) -> Result<bool> {
        let text = self.compile(query.command(), query.prefixes(), query.bindings())?;
        let body = self.post_query("ASK", &text)?;
        SparqlResults::parse(&body)?.boolean()
    }

    fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let text = self.compile(query.command(), query.prefixes(), query.bindings())?;
        let body = self.post_query("SELECT", &text)?;
        let rows = SparqlResults::parse(&body)?.rows();
        debug!("SELECT returned {} rows", rows.len());
        Ok(rows)
    }

    fn insert(&self, query: &InsertQuery) -> Result<bool> {
        let text = self.compile(query.command(), query.prefixes(), query.bindings())?;
        self.post_update(&text)?;
        Ok(true)
    }
}

fn transport(kind: &str, source: reqwest::Error) -> OntologyError {
    OntologyError::Transport {
        context: format!("{} request", kind),
        source,
    }
}

/// Any non-2xx reply is a failed execution; the body is kept for diagnosis
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(OntologyError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

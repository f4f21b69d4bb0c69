//! Query stub
//!
//! Statements are never evaluated. A query manager answers with results that
//! were seeded ahead of time through the builder functions at the bottom of
//! this module; unknown statements yield an empty result.

use crate::item::{ItemHandle, ItemId, Node};
use crate::iter::RangeIter;
use crate::session::Session;
use tracing::debug;

pub const XPATH: &str = "xpath";
pub const SQL: &str = "sql";
pub const JCR_SQL2: &str = "JCR-SQL2";

/// A seeded answer, stored by identity so seeds never keep handles alive.
#[derive(Debug, Clone)]
pub(crate) struct QuerySeed {
    statement: String,
    language: String,
    nodes: Vec<ItemId>,
}

/// Hands out queries answered from the session's seeds
#[derive(Debug, Clone)]
pub struct QueryManager {
    session: Session,
}

impl QueryManager {
    pub(crate) fn new(session: Session) -> Self {
        Self { session }
    }

    /// Query for `statement` in `language`, answered from a matching seed.
    pub fn create_query(&self, statement: &str, language: &str) -> Query {
        let seeded = self
            .session
            .queries()
            .read()
            .iter()
            .find(|seed| seed.statement == statement && seed.language == language)
            .map(|seed| seed.nodes.clone());
        debug!(statement, language, seeded = seeded.is_some(), "Query created");
        Query {
            session: self.session.clone(),
            statement: statement.to_string(),
            language: language.to_string(),
            nodes: seeded.unwrap_or_default(),
        }
    }

    /// Languages that have at least one seeded query.
    pub fn supported_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = Vec::new();
        for seed in self.session.queries().read().iter() {
            if !languages.contains(&seed.language) {
                languages.push(seed.language.clone());
            }
        }
        languages
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    session: Session,
    statement: String,
    language: String,
    nodes: Vec<ItemId>,
}

impl Query {
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Resolve the seeded nodes that are still live.
    pub fn execute(&self) -> QueryResult {
        let store = self.session.read();
        let live: Vec<ItemId> = self
            .nodes
            .iter()
            .copied()
            .filter(|id| store.find(*id).is_some_and(|r| r.is_node()))
            .collect();
        drop(store);
        QueryResult {
            nodes: live
                .into_iter()
                .map(|id| Node::new(self.session.clone(), id))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    nodes: Vec<Node>,
}

impl QueryResult {
    pub fn nodes(&self) -> RangeIter<Node> {
        RangeIter::new(self.nodes.clone())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builder installing seeded queries on a session
pub struct QueryManagerBuilder {
    session: Session,
    queries: Vec<QueryBuilder>,
}

pub struct QueryBuilder {
    statement: String,
    language: String,
    result: QueryResultBuilder,
}

#[derive(Default)]
pub struct QueryResultBuilder {
    nodes: Vec<Node>,
}

/// Start seeding queries for `session`.
pub fn query_manager(session: &Session) -> QueryManagerBuilder {
    QueryManagerBuilder {
        session: session.clone(),
        queries: Vec::new(),
    }
}

pub fn query(statement: &str, language: &str, result: QueryResultBuilder) -> QueryBuilder {
    QueryBuilder {
        statement: statement.to_string(),
        language: language.to_string(),
        result,
    }
}

pub fn result(nodes: impl IntoIterator<Item = Node>) -> QueryResultBuilder {
    QueryResultBuilder {
        nodes: nodes.into_iter().collect(),
    }
}

impl QueryManagerBuilder {
    pub fn query(mut self, query: QueryBuilder) -> Self {
        self.queries.push(query);
        self
    }

    /// Replace the session's seeds with the ones collected here.
    pub fn build(self) -> QueryManager {
        let seeds: Vec<QuerySeed> = self
            .queries
            .into_iter()
            .map(|q| QuerySeed {
                statement: q.statement,
                language: q.language,
                nodes: q.result.nodes.iter().map(|n| n.id()).collect(),
            })
            .collect();
        debug!(count = seeds.len(), "Seeded queries installed");
        *self.session.queries().write() = seeds;
        QueryManager::new(self.session)
    }
}

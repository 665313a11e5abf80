/**
 * query module
 *
 * - param: triples, parameter values and the binding table
 * - clause: WHERE group shared by SELECT and ASK (conditions, MINUS, filters)
 * - select / ask / insert: query builders
 * - statement: compiles command text + prefixes + bindings into final SPARQL
 */

pub mod ask;
pub mod clause;
pub mod insert;
pub mod param;
pub mod select;
pub mod statement;

pub use ask::{AskBuilder, AskQuery};
pub use clause::Operator;
pub use insert::{InsertBuilder, InsertParam, InsertQuery};
pub use param::{sanitize, Bindings, ParamKind, ParamValue, Triple};
pub use select::{Order, SelectBuilder, SelectQuery};
pub use statement::{standard_prefixes, ParameterizedStatement};

//! # sqlweave
//!
//! Build SQL statements as a tree, render them for any supported dialect.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use sqlweave::prelude::*;
//!
//! let query = Query::select()
//!     .field("CustomerID")
//!     .count(field("OrderID"))?
//!     .from("Orders")
//!     .filter(field("OrderDate").gt(param(Value::from(since))))?
//!     .group_by("CustomerID")
//!     .order_by("CustomerID")
//!     .build();
//!
//! let rendered = sqlweave::render(&query, &sql::POSTGRES)?;
//! // => SELECT "CustomerID", COUNT("OrderID") FROM "Orders" WHERE "OrderDate" > $1 ...
//! ```
//!
//! ## Layout
//!
//! | Module     | Role                                         |
//! |------------|----------------------------------------------|
//! | [`ast`]    | Clauses, expression sets, statements         |
//! | [`render`] | Single-pass renderer and dialect profiles    |
//! | [`codec`]  | Document encoding with registry decoding     |
//! | [`config`] | `config.toml` loading                        |

pub mod ast;
pub mod codec;
pub mod config;
pub mod error;
pub mod render;

pub use render::sql;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::codec::{Element, Registry};
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::render::dialect;
    pub use crate::render::{BoundParam, Capability, Profile, Rendered, render, sql};
}

pub use ast::Query;
pub use error::{WeaveError, WeaveResult};
pub use render::{Rendered, render};

//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Insert/update DTOs used by the repositories
//! - `Deserialize` request payloads accepted by the admin API

pub mod nav_link;

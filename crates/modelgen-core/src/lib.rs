//! Provider-agnostic core of **modelgen**: entities that generate
//! themselves from a single JSON-Schema-constrained LLM call.
//!
//! | Module          | Role in the pipeline                                               |
//! |-----------------|--------------------------------------------------------------------|
//! | [`entity`]      | capability contract, field casts, relation registry                |
//! | [`schema`]      | strict JSON Schema derivation and required-field validation        |
//! | [`seed`]        | caller input merged over entity defaults                           |
//! | [`template`]    | prompt references and the renderer boundary                        |
//! | [`client`]      | the single backend call                                            |
//! | [`normalize`]   | parse, seed precedence, sentinel mapping                           |
//! | [`materialize`] | root model plus one level of related records                       |
//! | [`persist`]     | all-or-nothing writes through a scoped transaction                 |
//! | [`factory`]     | `make` / `create` composed from the above                          |
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod factory;
pub mod generic;
pub mod materialize;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod seed;
pub mod template;

pub use client::GenerativeClient;
pub use factory::ModelFactory;

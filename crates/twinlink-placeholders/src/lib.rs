//! Placeholder and pipeline expression engine.
//!
//! Configuration strings such as target addresses, header mappings and
//! enforcement patterns may contain placeholder expressions:
//!
//! ```text
//! telemetry/{{ thing:namespace }}/{{ header:device_id | fn:substring-after(':') | fn:lower() }}
//! ```
//!
//! An expression starts with a `prefix:name` reference that is resolved by a
//! [`Placeholder`] of that prefix, followed by any number of `fn:` stages
//! from the [function catalog](functions). [`ExpressionResolver`] resolves
//! whole templates against an ordered chain of placeholders;
//! [`PlaceholderFilter`] validates templates without data, and
//! [`EnforcementFilterFactory`] checks that the identity claimed by an
//! inbound message matches the thing it addresses.
//!
//! ## Example
//!
//! ```
//! use twinlink_placeholders::placeholders::THING_PLACEHOLDER;
//! use twinlink_placeholders::PlaceholderFilter;
//!
//! PlaceholderFilter::validate("{{ thing:id }}/commands", &[&THING_PLACEHOLDER]).unwrap();
//!
//! let address =
//!     PlaceholderFilter::apply_placeholder("{{ thing:id }}/commands", &THING_PLACEHOLDER, "org.acme:lamp")
//!         .unwrap();
//! assert_eq!(address, "org.acme:lamp/commands");
//! ```

pub mod element;
pub mod enforcement;
pub mod error;
pub mod expression;
pub mod filter;
pub mod functions;
pub mod parser;
pub mod pipeline;
pub mod placeholders;
pub mod resolver;
pub mod signature;

pub use element::PipelineElement;
pub use enforcement::{EnforcementConfig, EnforcementFilter, EnforcementFilterFactory};
pub use error::{PlaceholderError, Result};
pub use expression::ExpressionResolver;
pub use filter::PlaceholderFilter;
pub use functions::PipelineFunction;
pub use placeholders::{AnyPlaceholder, Placeholder};
pub use resolver::{PlaceholderResolver, Resolver, ResolverMode};
pub use signature::{FunctionSignature, ParameterDefinition};

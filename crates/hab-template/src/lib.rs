//! Reference resolution for rule modules
//!
//! Module configuration may refer to values of the running rule. This crate
//! resolves those references against an [`ExecutionContext`](hab_core::ExecutionContext):
//!
//! # Templates
//!
//! - `"${name}"` - Whole-value reference, replaced by the context value itself
//! - `"Level ${sensor.value}%"` - Embedded reference, replaced by its text
//! - Unknown names are kept literally in configuration
//!
//! # Paths
//!
//! Reference names are path expressions evaluated over keyed containers and
//! property-bearing objects:
//!
//! - `event.payload` - Dotted hops, longest matching key first
//! - `[result][a.b]` - Bracketed keys, taken verbatim
//! - `.bean.e[f]` - Mixed property and container access
//!
//! # Example
//!
//! ```ignore
//! use hab_template::{resolve_configuration, get_value};
//!
//! let resolved = resolve_configuration(&module.configuration_values(), &context);
//! let level = get_value(&context.as_value(), "sensor1.state[level]");
//! ```

mod path;
mod resolver;
mod template;

pub use path::get_value;
pub use resolver::{
    resolve_composite_child_context, resolve_configuration, resolve_reference, resolve_value,
};
pub use template::{is_template, references, whole_reference, Reference};

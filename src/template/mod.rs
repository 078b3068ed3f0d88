//! Template Module
//!
//! `{{...}}` placeholder parsing and resolution.
//!
//! # Placeholder forms
//! - `{{name}}`, `{{user.profile.name}}`, `{{items.0}}`, `{{items[0]}}` - scope variables
//! - `{{$namespace.function(arg, "quoted arg")}}` - builtin calls
//! - `\{{` and `\}}` - literal braces

mod parser;
mod resolver;


pub use parser::{parse, parse_expr, Expr, Segment};
pub use resolver::TemplateResolver;

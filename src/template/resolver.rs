//! Template Resolver Module
//!
//! Materializes `{{...}}` placeholders against a point-in-time copy of the
//! scope store and the builtin registry.

use std::collections::HashSet;

use tracing::debug;

use super::parser::{has_placeholders, parse, Expr, Segment};
use crate::builtins::BuiltinRegistry;
use crate::error::{Result, StateError};
use crate::scope::{ScopeSnapshot, ScopeStore};
use crate::value::{lookup_path, to_text, Value};

// == Template Resolver ==
/// Resolves placeholders in strings and JSON documents.
///
/// Plain variables that have no binding fail with
/// [`StateError::UnresolvedVariable`]. A variable whose value itself holds
/// placeholders is resolved again; if that chain leads back to a variable
/// already being resolved, the chain stops and the value reached so far is
/// used verbatim.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    scopes: ScopeStore,
    builtins: BuiltinRegistry,
}

/// Result of resolving one nested value.
enum Nested {
    Resolved(String),
    /// A variable in the current chain was referenced again
    Cycle,
}

impl TemplateResolver {
    // == Constructors ==
    /// Creates a resolver over `scopes` with the default builtin namespaces.
    pub fn new(scopes: ScopeStore) -> Self {
        Self::with_builtins(scopes, BuiltinRegistry::with_defaults())
    }

    pub fn with_builtins(scopes: ScopeStore, builtins: BuiltinRegistry) -> Self {
        Self { scopes, builtins }
    }

    pub fn scopes(&self) -> &ScopeStore {
        &self.scopes
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    /// Mutable access for registering extra namespaces.
    pub fn builtins_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.builtins
    }

    // == Resolve ==
    /// Replaces every placeholder in `input`.
    ///
    /// Scope state is copied once at call start; concurrent writers are
    /// neither awaited nor observed.
    pub fn resolve(&self, input: &str) -> Result<String> {
        if !has_placeholders(input) {
            return Ok(input.to_string());
        }
        let snapshot = self.scopes.export_snapshot();
        self.resolve_in(&snapshot, input)
    }

    /// Like [`resolve`](Self::resolve), with extra local bindings that exist
    /// only for this call.
    pub fn resolve_with_locals<I, K, V>(&self, input: &str, locals: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut snapshot = self.scopes.export_snapshot();
        snapshot
            .local
            .extend(locals.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.resolve_in(&snapshot, input)
    }

    /// Deep-copies `value`, resolving every string leaf.
    ///
    /// Map keys and non-string scalars are left untouched.
    pub fn resolve_object(&self, value: &Value) -> Result<Value> {
        let snapshot = self.scopes.export_snapshot();
        self.resolve_value_in(&snapshot, value)
    }

    /// Resolves `input` against an explicit snapshot instead of the live store.
    pub fn resolve_in(&self, snapshot: &ScopeSnapshot, input: &str) -> Result<String> {
        let mut chain = HashSet::new();
        match self.resolve_text(snapshot, input, &mut chain)? {
            Nested::Resolved(text) => Ok(text),
            // the chain starts empty, so a cycle cannot surface at the top
            Nested::Cycle => Ok(input.to_string()),
        }
    }

    fn resolve_value_in(&self, snapshot: &ScopeSnapshot, value: &Value) -> Result<Value> {
        Ok(match value {
            Value::String(s) => Value::String(self.resolve_in(snapshot, s)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value_in(snapshot, item))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.clone(), self.resolve_value_in(snapshot, v)?)))
                    .collect::<Result<_>>()?,
            ),
            other => other.clone(),
        })
    }

    /// Variable names referenced by `input`, in order of first appearance.
    ///
    /// Builtin calls are not listed. Nested values are not followed.
    pub fn placeholders(input: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(parse(input)?
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(Expr::Variable { path }) => Some(path.join(".")),
                _ => None,
            })
            .filter(|name| seen.insert(name.clone()))
            .collect())
    }

    // == Internals ==
    fn resolve_text(
        &self,
        snapshot: &ScopeSnapshot,
        text: &str,
        chain: &mut HashSet<String>,
    ) -> Result<Nested> {
        let mut out = String::with_capacity(text.len());

        for segment in parse(text)? {
            match segment {
                Segment::Literal(literal) => out.push_str(&literal),
                Segment::Placeholder(Expr::Builtin {
                    namespace,
                    path,
                    args,
                }) => out.push_str(&self.builtins.resolve(&namespace, &path, &args)?),
                Segment::Placeholder(Expr::Variable { path }) => {
                    match self.resolve_variable(snapshot, &path, chain)? {
                        Nested::Resolved(value) => out.push_str(&value),
                        Nested::Cycle => return Ok(Nested::Cycle),
                    }
                }
            }
        }

        Ok(Nested::Resolved(out))
    }

    fn resolve_variable(
        &self,
        snapshot: &ScopeSnapshot,
        path: &[String],
        chain: &mut HashSet<String>,
    ) -> Result<Nested> {
        let name = path.join(".");
        if chain.contains(&name) {
            debug!(variable = %name, "Reference cycle reached, keeping last value");
            return Ok(Nested::Cycle);
        }

        let value = path
            .split_first()
            .and_then(|(root, rest)| snapshot.get(root).and_then(|v| lookup_path(v, rest)))
            .ok_or_else(|| StateError::UnresolvedVariable {
                name: name.clone(),
                known_keys: snapshot.keys(),
            })?;

        let text = match value {
            Value::String(s) if has_placeholders(s) => s,
            other => return Ok(Nested::Resolved(to_text(other))),
        };

        chain.insert(name.clone());
        let nested = self.resolve_text(snapshot, text, chain);
        chain.remove(&name);

        Ok(match nested? {
            Nested::Resolved(resolved) => Nested::Resolved(resolved),
            Nested::Cycle => Nested::Resolved(text.clone()),
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> TemplateResolver {
        let scopes = ScopeStore::new();
        scopes.set_global("baseUrl", "https://api.example.com");
        scopes.set_global("port", 8080);
        scopes.set_local("userId", "12345");
        TemplateResolver::new(scopes)
    }

    #[test]
    fn test_simple_substitution() {
        let r = resolver();
        assert_eq!(
            r.resolve("GET {{baseUrl}}/users").unwrap(),
            "GET https://api.example.com/users"
        );
    }

    #[test]
    fn test_multiple_variables() {
        let r = resolver();
        r.scopes().set_local("a", "x");
        r.scopes().set_local("b", "y");
        assert_eq!(r.resolve("{{a}}-{{b}}").unwrap(), "x-y");
        assert_eq!(
            r.resolve("{{baseUrl}}:{{port}}/u/{{userId}}").unwrap(),
            "https://api.example.com:8080/u/12345"
        );
    }

    #[test]
    fn test_local_shadows_global() {
        let r = resolver();
        r.scopes().set_local("baseUrl", "http://localhost");
        assert_eq!(r.resolve("{{baseUrl}}").unwrap(), "http://localhost");
    }

    #[test]
    fn test_nested_access() {
        let r = resolver();
        r.scopes()
            .set_local("user", json!({"profile": {"name": "Ada"}, "roles": ["admin"]}));
        r.scopes().set_local("list", json!(["a", "b"]));

        assert_eq!(r.resolve("{{user.profile.name}}").unwrap(), "Ada");
        assert_eq!(r.resolve("{{list.0}}").unwrap(), "a");
        assert_eq!(r.resolve("{{user.roles[0]}}").unwrap(), "admin");
    }

    #[test]
    fn test_non_string_values_rendered_canonically() {
        let r = resolver();
        r.scopes().set_local("flag", true);
        r.scopes().set_local("nothing", Value::Null);
        r.scopes().set_local("obj", json!({"a": [1, 2]}));
        assert_eq!(
            r.resolve("{{flag}} {{nothing}} {{obj}}").unwrap(),
            r#"true null {"a":[1,2]}"#
        );
    }

    #[test]
    fn test_unresolved_lists_known_keys() {
        let r = resolver();
        match r.resolve("GET {{missing}}/users") {
            Err(StateError::UnresolvedVariable { name, known_keys }) => {
                assert_eq!(name, "missing");
                assert_eq!(known_keys, vec!["baseUrl", "port", "userId"]);
            }
            other => panic!("Expected UnresolvedVariable, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_nested_segment_is_unresolved() {
        let r = resolver();
        r.scopes().set_local("user", json!({"profile": {}}));
        assert!(matches!(
            r.resolve("{{user.profile.name}}"),
            Err(StateError::UnresolvedVariable { name, .. }) if name == "user.profile.name"
        ));
        assert!(r.resolve("{{baseUrl.host}}").is_err());
    }

    #[test]
    fn test_recursive_values() {
        let r = resolver();
        r.scopes().set_global("apiRoot", "{{baseUrl}}/v1");
        r.scopes().set_local("usersUrl", "{{apiRoot}}/users/{{userId}}");
        assert_eq!(
            r.resolve("{{usersUrl}}").unwrap(),
            "https://api.example.com/v1/users/12345"
        );
    }

    #[test]
    fn test_mutual_cycle_terminates_with_last_value() {
        let r = resolver();
        r.scopes().set_local("x", "{{y}}");
        r.scopes().set_local("y", "{{x}}");
        assert_eq!(r.resolve("{{x}}").unwrap(), "{{x}}");
        assert_eq!(r.resolve("{{y}}").unwrap(), "{{y}}");
    }

    #[test]
    fn test_self_reference_terminates() {
        let r = resolver();
        r.scopes().set_local("me", "a-{{me}}");
        assert_eq!(r.resolve("<{{me}}>").unwrap(), "<a-{{me}}>");
    }

    #[test]
    fn test_same_variable_twice_is_not_a_cycle() {
        let r = resolver();
        r.scopes().set_local("pair", "{{userId}}/{{userId}}");
        assert_eq!(r.resolve("{{pair}}").unwrap(), "12345/12345");
    }

    #[test]
    fn test_unresolved_inside_nested_value_propagates() {
        let r = resolver();
        r.scopes().set_local("broken", "{{nope}}");
        assert!(matches!(
            r.resolve("{{broken}}"),
            Err(StateError::UnresolvedVariable { name, .. }) if name == "nope"
        ));
    }

    #[test]
    fn test_builtins() {
        let r = resolver();
        let id = r.resolve("{{$random.uuid}}").unwrap();
        assert_eq!(id.len(), 36);
        assert_eq!(r.resolve("{{$math.add(2, 3)}}").unwrap(), "5");
        assert_eq!(r.resolve("{{ $string.upper('hi there') }}").unwrap(), "HI THERE");
    }

    #[test]
    fn test_unknown_namespace() {
        let r = resolver();
        assert!(matches!(
            r.resolve("{{$nope.fn}}"),
            Err(StateError::UnknownNamespace { .. })
        ));
    }

    #[test]
    fn test_custom_namespace() {
        let mut r = resolver();
        r.builtins_mut()
            .register("tenant", |path: &str, _: &[String]| -> Result<String> {
                Ok(format!("tenant-{}", path))
            });
        assert_eq!(r.resolve("{{$tenant.eu}}").unwrap(), "tenant-eu");
    }

    #[test]
    fn test_builtin_output_is_not_reresolved() {
        let mut r = resolver();
        r.builtins_mut()
            .register("raw", |_: &str, _: &[String]| -> Result<String> {
                Ok("{{baseUrl}}".to_string())
            });
        assert_eq!(r.resolve("{{$raw.x}}").unwrap(), "{{baseUrl}}");
    }

    #[test]
    fn test_escaped_braces() {
        let r = resolver();
        assert_eq!(
            r.resolve(r"literal \{{baseUrl\}} and {{baseUrl}}").unwrap(),
            "literal {{baseUrl}} and https://api.example.com"
        );
    }

    #[test]
    fn test_text_without_placeholders() {
        let r = resolver();
        assert_eq!(r.resolve("").unwrap(), "");
        assert_eq!(r.resolve(r#"{"a":{"b":1}}"#).unwrap(), r#"{"a":{"b":1}}"#);
    }

    #[test]
    fn test_resolve_object() {
        let r = resolver();
        let body = json!({
            "url": "{{baseUrl}}/users",
            "ids": ["{{userId}}", 7, null],
            "nested": {"port": "{{port}}", "enabled": true},
            "{{userId}}": "key untouched"
        });

        let resolved = r.resolve_object(&body).unwrap();
        assert_eq!(
            resolved,
            json!({
                "url": "https://api.example.com/users",
                "ids": ["12345", 7, null],
                "nested": {"port": "8080", "enabled": true},
                "{{userId}}": "key untouched"
            })
        );
        // input untouched
        assert_eq!(body["url"], json!("{{baseUrl}}/users"));
    }

    #[test]
    fn test_resolve_object_propagates_errors() {
        let r = resolver();
        assert!(r.resolve_object(&json!({"a": ["{{missing}}"]})).is_err());
    }

    #[test]
    fn test_resolve_with_locals() {
        let r = resolver();
        let out = r
            .resolve_with_locals("{{baseUrl}}/{{item}}", [("item", "42")])
            .unwrap();
        assert_eq!(out, "https://api.example.com/42");
        assert!(!r.scopes().has("item"));
    }

    #[test]
    fn test_placeholders() {
        let names =
            TemplateResolver::placeholders("{{a}} {{b.c}} {{$random.uuid}} {{a}}").unwrap();
        assert_eq!(names, vec!["a", "b.c"]);
    }
}

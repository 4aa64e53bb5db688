//! Connection resolution: server, credentials, and run policy.
//!
//! Every field resolves through the same precedence chain: explicit command
//! value, then the document's `artifactory` section, then an interactive
//! prompt. The resolved [`ConnectionContext`] is immutable; everything after
//! resolution reads it as-is.

use crate::config::Document;
use crate::error::{Error, Result};
use dialoguer::{Input, Password};

/// Default scheme used when the server value is a bare hostname.
const DEFAULT_SCHEME: &str = "http";

/// Default public context path appended to a bare hostname.
const DEFAULT_CONTEXT_PATH: &str = "artifactory";

/// Fully resolved connection settings, shared read-only by all operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Full base URL of the management endpoint, e.g.
    /// `http://art.example.com/artifactory`.
    pub base_url: String,
    /// Public context path extracted from or appended to the server value.
    /// Informational only.
    pub context_path: String,
    pub username: String,
    pub password: String,
    /// Whether creates may overwrite existing same-identifier entities.
    pub destructive: bool,
}

/// Values supplied explicitly at invocation time. Always win over the
/// document and the prompt.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target_server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub destructive: bool,
    pub safe: bool,
}

/// Connection fields that may need to be prompted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TargetServer,
    Username,
    Password,
}

impl Field {
    /// Prompt label shown to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TargetServer => "targetServer",
            Self::Username => "username",
            Self::Password => "password",
        }
    }
}

/// Capability interface for supplying connection values that neither the
/// command line nor the document provided.
///
/// The terminal implementation prompts interactively; batch and test callers
/// supply non-interactive implementations instead.
pub trait CredentialSource {
    fn provide(&mut self, field: Field) -> Result<String>;
}

/// Interactive prompt on the controlling terminal. Passwords do not echo.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialSource for TerminalPrompt {
    fn provide(&mut self, field: Field) -> Result<String> {
        let value = match field {
            Field::Password => Password::new()
                .with_prompt(field.label())
                .interact()
                .map_err(|e| Error::configuration(format!("password prompt failed: {e}")))?,
            _ => Input::<String>::new()
                .with_prompt(field.label())
                .interact_text()
                .map_err(|e| {
                    Error::configuration(format!("{} prompt failed: {e}", field.label()))
                })?,
        };
        Ok(value)
    }
}

/// Non-interactive source that refuses every prompt. Used when stdin is not
/// a terminal; turns a would-be prompt into a configuration error.
#[derive(Debug, Default)]
pub struct NoPrompt;

impl CredentialSource for NoPrompt {
    fn provide(&mut self, field: Field) -> Result<String> {
        Err(Error::configuration(format!(
            "no value for '{}' and prompting is disabled",
            field.label()
        )))
    }
}

/// Resolve the full connection context from overrides, document, and prompt.
///
/// Fails with [`Error::Configuration`] if the server value cannot be resolved
/// through any source.
pub fn resolve(
    overrides: &Overrides,
    doc: &Document,
    source: &mut dyn CredentialSource,
) -> Result<ConnectionContext> {
    let server = resolve_field(
        overrides.target_server.as_deref(),
        doc.artifactory.as_ref().and_then(|a| a.server()),
        Field::TargetServer,
        source,
    )?;
    let (base_url, context_path) = expand_base_url(&server, doc.server_public_context_path.as_deref());

    let username = resolve_field(
        overrides.username.as_deref(),
        doc.artifactory.as_ref().and_then(|a| a.username.as_deref()),
        Field::Username,
        source,
    )?;
    let password = resolve_field(
        overrides.password.as_deref(),
        doc.artifactory.as_ref().and_then(|a| a.password.as_deref()),
        Field::Password,
        source,
    )?;

    Ok(ConnectionContext {
        base_url,
        context_path,
        username,
        password,
        destructive: resolve_destructive(overrides, doc),
    })
}

/// One field through the precedence chain: explicit > document > prompt.
fn resolve_field(
    explicit: Option<&str>,
    document: Option<&str>,
    field: Field,
    source: &mut dyn CredentialSource,
) -> Result<String> {
    if let Some(value) = explicit {
        return Ok(value.to_string());
    }
    if let Some(value) = document {
        return Ok(value.to_string());
    }
    log::debug!("prompting for {}", field.label());
    source.provide(field)
}

/// Resolve the destructive flag: explicit flag > document key > false, with a
/// `safe` flag from either source unconditionally forcing it off.
fn resolve_destructive(overrides: &Overrides, doc: &Document) -> bool {
    let mut destructive = overrides.destructive || doc.destructive.unwrap_or(false);
    if overrides.safe || doc.safe.unwrap_or(false) {
        destructive = false;
    }
    destructive
}

/// Expand a server value into a full base URL and its public context path.
///
/// A value carrying a scheme passes through unchanged, with the context path
/// extracted for informational use. A bare hostname is prefixed with the
/// default scheme and suffixed with the context path (`artifactory` unless
/// the document overrides it).
#[must_use]
pub fn expand_base_url(server: &str, context_override: Option<&str>) -> (String, String) {
    if let Some((_, rest)) = server.split_once("://") {
        let context_path = rest
            .split_once('/')
            .map(|(_, path)| path.trim_end_matches('/').to_string())
            .unwrap_or_default();
        return (server.to_string(), context_path);
    }

    let context_path = context_override.unwrap_or(DEFAULT_CONTEXT_PATH).to_string();
    let base_url = format!("{DEFAULT_SCHEME}://{server}/{context_path}");
    (base_url, context_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted source feeding fixed answers; records which fields were asked.
    struct Scripted {
        answers: Vec<(Field, &'static str)>,
        asked: Vec<Field>,
    }

    impl Scripted {
        fn new(answers: Vec<(Field, &'static str)>) -> Self {
            Self {
                answers,
                asked: Vec::new(),
            }
        }
    }

    impl CredentialSource for Scripted {
        fn provide(&mut self, field: Field) -> Result<String> {
            self.asked.push(field);
            self.answers
                .iter()
                .find(|(f, _)| *f == field)
                .map(|(_, v)| (*v).to_string())
                .ok_or_else(|| Error::configuration(format!("unscripted field {field:?}")))
        }
    }

    fn doc_with_connection() -> Document {
        serde_json::from_str(
            r#"{
                "artifactory": {
                    "hostname": "doc.example.com",
                    "username": "doc-user",
                    "password": "doc-pass"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn explicit_values_win_over_document() {
        let overrides = Overrides {
            target_server: Some("cli.example.com".into()),
            username: Some("cli-user".into()),
            password: Some("cli-pass".into()),
            ..Default::default()
        };
        let mut source = Scripted::new(vec![]);
        let ctx = resolve(&overrides, &doc_with_connection(), &mut source).unwrap();

        assert_eq!(ctx.base_url, "http://cli.example.com/artifactory");
        assert_eq!(ctx.username, "cli-user");
        assert_eq!(ctx.password, "cli-pass");
        assert!(source.asked.is_empty());
    }

    #[test]
    fn document_values_win_over_prompt() {
        let mut source = Scripted::new(vec![]);
        let ctx = resolve(&Overrides::default(), &doc_with_connection(), &mut source).unwrap();

        assert_eq!(ctx.base_url, "http://doc.example.com/artifactory");
        assert_eq!(ctx.username, "doc-user");
        assert_eq!(ctx.password, "doc-pass");
        assert!(source.asked.is_empty());
    }

    #[test]
    fn prompt_is_the_last_resort() {
        let mut source = Scripted::new(vec![
            (Field::TargetServer, "prompted.example.com"),
            (Field::Username, "prompted-user"),
            (Field::Password, "prompted-pass"),
        ]);
        let ctx = resolve(&Overrides::default(), &Document::default(), &mut source).unwrap();

        assert_eq!(ctx.base_url, "http://prompted.example.com/artifactory");
        assert_eq!(ctx.username, "prompted-user");
        assert_eq!(ctx.password, "prompted-pass");
        assert_eq!(
            source.asked,
            vec![Field::TargetServer, Field::Username, Field::Password]
        );
    }

    #[test]
    fn unresolvable_server_is_a_configuration_error() {
        let mut source = NoPrompt;
        let err = resolve(&Overrides::default(), &Document::default(), &mut source).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn hostname_expands_with_default_context_path() {
        let (base_url, context) = expand_base_url("art.example.com", None);
        assert_eq!(base_url, "http://art.example.com/artifactory");
        assert_eq!(context, "artifactory");
    }

    #[test]
    fn hostname_expands_with_context_override() {
        let (base_url, context) = expand_base_url("art.example.com", Some("repo"));
        assert_eq!(base_url, "http://art.example.com/repo");
        assert_eq!(context, "repo");
    }

    #[test]
    fn full_url_passes_through_unchanged() {
        let (base_url, context) =
            expand_base_url("https://art.example.com:5000/ServerPublicContext", None);
        assert_eq!(base_url, "https://art.example.com:5000/ServerPublicContext");
        assert_eq!(context, "ServerPublicContext");
    }

    #[test]
    fn full_url_without_path_has_empty_context() {
        let (base_url, context) = expand_base_url("https://art.example.com", None);
        assert_eq!(base_url, "https://art.example.com");
        assert_eq!(context, "");
    }

    #[test]
    fn destructive_defaults_to_false() {
        let ctx = resolve(
            &Overrides {
                target_server: Some("h".into()),
                username: Some("u".into()),
                password: Some("p".into()),
                ..Default::default()
            },
            &Document::default(),
            &mut NoPrompt,
        )
        .unwrap();
        assert!(!ctx.destructive);
    }

    #[test]
    fn destructive_from_flag_or_document() {
        let doc: Document = serde_json::from_str(r#"{"destructive": true}"#).unwrap();
        assert!(resolve_destructive(&Overrides::default(), &doc));
        assert!(resolve_destructive(
            &Overrides {
                destructive: true,
                ..Default::default()
            },
            &Document::default(),
        ));
    }

    #[test]
    fn safe_always_wins() {
        let destructive_doc: Document = serde_json::from_str(r#"{"destructive": true}"#).unwrap();
        let safe_doc: Document =
            serde_json::from_str(r#"{"destructive": true, "safe": true}"#).unwrap();

        // safe flag beats destructive from anywhere
        assert!(!resolve_destructive(
            &Overrides {
                destructive: true,
                safe: true,
                ..Default::default()
            },
            &destructive_doc,
        ));
        assert!(!resolve_destructive(
            &Overrides {
                safe: true,
                ..Default::default()
            },
            &destructive_doc,
        ));
        assert!(!resolve_destructive(
            &Overrides {
                destructive: true,
                ..Default::default()
            },
            &safe_doc,
        ));
    }
}

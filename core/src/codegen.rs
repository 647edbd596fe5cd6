#![deny(missing_docs)]

//! # Code Generation
//!
//! Renders the client file for a set of resolved content types.
//!
//! Each content type contributes an entity declaration plus one function per
//! permitted action. The language specific parts (signatures, type syntax, the
//! runtime helper) come from a [`ClientTarget`]; the request call inside each
//! function is shared, since it is plain JavaScript in both languages.

use crate::error::{AppError, AppResult};
use crate::permissions::{Action, ContentTypeUid};
use crate::schema::{ContentType, ContentTypeKind};
use crate::targets::ClientTarget;
use crate::type_mapping::{body_fields, Field};
use heck::ToUpperCamelCase;
use std::collections::HashSet;

/// Identifiers declared by every target's prelude, plus the global types the
/// generated signatures refer to.
pub const RESERVED_NAMES: [&str; 10] = [
    "BASE_URL",
    "API_TOKEN",
    "request",
    "Query",
    "Id",
    "StrapiResponse",
    "Record",
    "Promise",
    "Partial",
    "Object",
];

/// Where the generated client gets its bearer token from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenBinding {
    /// Written into the file as a string literal.
    Embedded(String),
    /// Read from `process.env[name]` at runtime.
    Environment(String),
}

/// File level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// CMS origin, e.g. `http://localhost:1337`.
    pub base_url: String,
    /// Token source.
    pub token: TokenBinding,
}

/// Shape of the JSON body sent by a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// Every required field must be supplied.
    Full,
    /// Any subset of fields.
    Partial,
}

/// The names and fields of one content type's declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Entry type name, e.g. `Article`.
    pub name: String,
    /// Writable fields type name, e.g. `ArticleInput`.
    pub input_name: String,
    /// `api::article.article`.
    pub uid: String,
    /// Display name or description used in doc comments.
    pub summary: Option<String>,
    /// Writable scalar fields.
    pub fields: Vec<Field>,
}

impl Entity {
    /// Derives the declaration names from the schema's singular name.
    pub fn from_content_type(ct: &ContentType) -> Self {
        let name = ct.schema.info.singular_name.to_upper_camel_case();
        let info = &ct.schema.info;
        Self {
            input_name: format!("{}Input", name),
            name,
            uid: ct.uid.to_string(),
            summary: info.description.clone().or_else(|| info.display_name.clone()),
            fields: body_fields(&ct.schema),
        }
    }
}

/// One generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The Strapi action it performs.
    pub action: Action,
    /// Function identifier.
    pub function_name: String,
    /// HTTP method.
    pub method: &'static str,
    /// Endpoint path relative to the origin, without the id segment.
    pub path: String,
    /// Whether the function takes an `id` appended to the path.
    pub by_id: bool,
    /// Request body, if any.
    pub body: Option<BodyShape>,
    /// Whether the function accepts query parameters.
    pub accepts_query: bool,
    /// The entity the response carries.
    pub entity: String,
    /// The input type for bodies.
    pub input: String,
    /// Response `data` is an array.
    pub returns_list: bool,
}

/// Lists the functions a content type gets, in action order.
///
/// `findOne` and `create` have no endpoint on single types and are dropped.
pub fn operations(ct: &ContentType, entity: &Entity) -> Vec<Operation> {
    let path = ct.path();
    let singular = ct.schema.info.singular_name.to_upper_camel_case();
    let plural = ct.schema.info.plural_name.to_upper_camel_case();
    let single = ct.schema.kind == ContentTypeKind::SingleType;

    let mut ops = Vec::new();
    for action in &ct.actions {
        let (method, by_id, body, accepts_query, returns_list) = match (*action, single) {
            (Action::Find, false) => ("GET", false, None, true, true),
            (Action::Find, true) => ("GET", false, None, true, false),
            (Action::FindOne, false) => ("GET", true, None, true, false),
            (Action::Create, false) => ("POST", false, Some(BodyShape::Full), false, false),
            (Action::Update, single) => ("PUT", !single, Some(BodyShape::Partial), false, false),
            (Action::Delete, single) => ("DELETE", !single, None, false, false),
            (Action::FindOne | Action::Create, true) => {
                tracing::debug!(content_type = %ct.uid, action = %action, "not available on single types");
                continue;
            }
        };

        let suffix = if *action == Action::Find && !single {
            &plural
        } else {
            &singular
        };

        ops.push(Operation {
            action: *action,
            function_name: format!("{}{}", action.as_str(), suffix),
            method,
            path: path.clone(),
            by_id,
            body,
            accepts_query,
            entity: entity.name.clone(),
            input: entity.input_name.clone(),
            returns_list,
        });
    }
    ops
}

/// Renders a JavaScript string literal.
pub fn js_string(s: &str) -> String {
    // JSON strings are valid JS string literals, except for the two line
    // separators which older engines reject unescaped.
    serde_json::to_string(s)
        .unwrap_or_else(|_| String::from("\"\""))
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Renders an object key, quoting it when it is not a plain identifier.
pub fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        name.to_string()
    } else {
        js_string(name)
    }
}

/// Makes text safe to place inside a `/* */` comment.
pub fn comment_text(s: &str) -> String {
    s.replace("*/", "*\\/").replace('\n', " ")
}

/// The path expression passed to `request`.
fn path_expr(op: &Operation) -> String {
    if op.by_id {
        let escaped = op
            .path
            .replace('\\', "\\\\")
            .replace('`', "\\`")
            .replace('$', "\\$");
        format!("`{}/${{encodeURIComponent(String(id))}}`", escaped)
    } else {
        js_string(&op.path)
    }
}

/// The single statement making up a function body.
pub fn call_statement(op: &Operation) -> String {
    let mut args = vec![js_string(op.method), path_expr(op)];
    match (op.body, op.accepts_query) {
        (Some(_), _) => args.push("{ data }".to_string()),
        (None, true) => {
            args.push("undefined".to_string());
            args.push("query".to_string());
        }
        (None, false) => {}
    }
    format!("  return request({});\n", args.join(", "))
}

fn claim(names: &mut HashSet<String>, name: &str, owner: &str) -> AppResult<()> {
    if !names.insert(name.to_string()) {
        return Err(AppError::General(format!(
            "Generated name '{}' for {} collides with another declaration",
            name, owner
        )));
    }
    Ok(())
}

/// A rendered client and the functions it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedClient {
    /// File contents.
    pub code: String,
    /// Actions that got a function, per content type in UID order. Content
    /// types without any function are absent.
    pub emitted: Vec<(ContentTypeUid, Vec<Action>)>,
}

/// Generates the complete client file.
///
/// Content types are emitted in UID order regardless of input order.
pub fn generate_client<T: ClientTarget + ?Sized>(
    content_types: &[ContentType],
    options: &ClientOptions,
    target: &T,
) -> AppResult<String> {
    render_client(content_types, options, target).map(|client| client.code)
}

/// Like [`generate_client`], but also reports which functions were emitted.
pub fn render_client<T: ClientTarget + ?Sized>(
    content_types: &[ContentType],
    options: &ClientOptions,
    target: &T,
) -> AppResult<RenderedClient> {
    let mut sorted: Vec<&ContentType> = content_types.iter().collect();
    sorted.sort_by(|a, b| a.uid.cmp(&b.uid));

    let mut names: HashSet<String> = RESERVED_NAMES.iter().map(|s| s.to_string()).collect();
    let mut code = target.prelude(options);
    let mut emitted = Vec::new();

    for ct in sorted {
        let owner = ct.uid.to_string();
        let entity = Entity::from_content_type(ct);
        let ops = operations(ct, &entity);
        if ops.is_empty() {
            tracing::warn!(content_type = %ct.uid, "no usable actions, skipping");
            continue;
        }

        claim(&mut names, &entity.name, &owner)?;
        claim(&mut names, &entity.input_name, &owner)?;
        code.push('\n');
        code.push_str(&target.entity(&entity));

        for op in &ops {
            claim(&mut names, &op.function_name, &owner)?;
            code.push('\n');
            code.push_str(&target.function_open(op));
            code.push_str(&call_statement(op));
            code.push_str("}\n");
        }
        tracing::debug!(content_type = %ct.uid, functions = ops.len(), "rendered");
        emitted.push((ct.uid.clone(), ops.iter().map(|op| op.action).collect()));
    }

    Ok(RenderedClient { code, emitted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema;
    use crate::targets::{JavaScriptTarget, TypeScriptTarget};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn article(actions: &[Action]) -> ContentType {
        let schema = parse_schema(
            r#"{
  "kind": "collectionType",
  "info": {"singularName": "blog-post", "pluralName": "blog-posts", "displayName": "Blog Post"},
  "attributes": {
    "title": {"type": "string", "required": true},
    "state": {"type": "enumeration", "enum": ["draft", "live"]},
    "author": {"type": "relation", "relation": "manyToOne", "target": "api::author.author"}
  }
}"#,
        )
        .unwrap();
        ContentType::new(
            ContentTypeUid::new("blog", "blog-post"),
            schema,
            actions.iter().copied().collect(),
            "http://localhost:1337",
        )
    }

    fn homepage(actions: &[Action]) -> ContentType {
        let schema = parse_schema(
            r#"{"kind": "singleType", "info": {"singularName": "homepage", "pluralName": "homepages"},
                "attributes": {"headline": {"type": "text"}}}"#,
        )
        .unwrap();
        ContentType::new(
            ContentTypeUid::new("homepage", "homepage"),
            schema,
            actions.iter().copied().collect(),
            "http://localhost:1337",
        )
    }

    fn options() -> ClientOptions {
        ClientOptions {
            base_url: "http://localhost:1337".into(),
            token: TokenBinding::Environment("STRAPI_API_TOKEN".into()),
        }
    }

    #[test]
    fn test_collection_operations() {
        let ct = article(&Action::ALL);
        let ops = operations(&ct, &Entity::from_content_type(&ct));
        let summary: Vec<(&str, &str, bool)> = ops
            .iter()
            .map(|o| (o.function_name.as_str(), o.method, o.by_id))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("findBlogPosts", "GET", false),
                ("findOneBlogPost", "GET", true),
                ("createBlogPost", "POST", false),
                ("updateBlogPost", "PUT", true),
                ("deleteBlogPost", "DELETE", true),
            ]
        );
        assert_eq!(ops[0].path, "/api/blog-posts");
    }

    #[test]
    fn test_single_type_operations() {
        let ct = homepage(&Action::ALL);
        let ops = operations(&ct, &Entity::from_content_type(&ct));
        let names: Vec<&str> = ops.iter().map(|o| o.function_name.as_str()).collect();
        assert_eq!(names, vec!["findHomepage", "updateHomepage", "deleteHomepage"]);
        assert!(ops.iter().all(|o| !o.by_id));
    }

    #[test]
    fn test_call_statements() {
        let ct = article(&Action::ALL);
        let ops = operations(&ct, &Entity::from_content_type(&ct));
        let calls: Vec<String> = ops.iter().map(call_statement).collect();
        assert_eq!(
            calls,
            vec![
                "  return request(\"GET\", \"/api/blog-posts\", undefined, query);\n",
                "  return request(\"GET\", `/api/blog-posts/${encodeURIComponent(String(id))}`, undefined, query);\n",
                "  return request(\"POST\", \"/api/blog-posts\", { data });\n",
                "  return request(\"PUT\", `/api/blog-posts/${encodeURIComponent(String(id))}`, { data });\n",
                "  return request(\"DELETE\", `/api/blog-posts/${encodeURIComponent(String(id))}`);\n",
            ]
        );
    }

    #[test]
    fn test_typescript_client() {
        let code = generate_client(
            &[homepage(&[Action::Find]), article(&[Action::Find, Action::Create])],
            &options(),
            &TypeScriptTarget,
        )
        .unwrap();

        assert!(code.contains("const BASE_URL = \"http://localhost:1337\";"));
        assert!(code.contains("const API_TOKEN: string = process.env[\"STRAPI_API_TOKEN\"] ?? \"\";"));
        assert!(code.contains("export interface BlogPostInput {\n  title: string;\n  state?: \"draft\" | \"live\";\n}"));
        assert!(!code.contains("  author"));
        assert!(code.contains(
            "export async function findBlogPosts(query?: Query): Promise<StrapiResponse<BlogPost[]>> {"
        ));
        assert!(code.contains(
            "export async function createBlogPost(data: BlogPostInput): Promise<StrapiResponse<BlogPost>> {"
        ));
        assert!(code.contains("export async function findHomepage(query?: Query)"));

        // api::blog.blog-post sorts before api::homepage.homepage
        let blog = code.find("findBlogPosts").unwrap();
        let home = code.find("findHomepage").unwrap();
        assert!(blog < home);
    }

    #[test]
    fn test_javascript_client() {
        let code = generate_client(
            &[article(&[Action::Update, Action::Delete])],
            &ClientOptions {
                base_url: "http://localhost:1337".into(),
                token: TokenBinding::Embedded("abc\"def".into()),
            },
            &JavaScriptTarget,
        )
        .unwrap();

        assert!(code.contains("const API_TOKEN = \"abc\\\"def\";"));
        assert!(code.contains(" * @typedef {Object} BlogPostInput"));
        assert!(code.contains(" * @property {\"draft\" | \"live\"} [state]"));
        assert!(code.contains("export async function updateBlogPost(id, data) {"));
        assert!(code.contains("export async function deleteBlogPost(id) {"));
        assert!(!code.contains(": Promise"));
    }

    #[test]
    fn test_name_collisions_are_errors() {
        let mut other = article(&[Action::Find]);
        other.uid = ContentTypeUid::new("legacy", "blog-post");

        let err = generate_client(&[article(&[Action::Find]), other], &options(), &TypeScriptTarget)
            .unwrap_err();
        assert!(format!("{}", err).contains("'BlogPost' for api::legacy.blog-post"));
    }

    #[test]
    fn test_reserved_names_are_protected() {
        let schema = parse_schema(
            r#"{"kind": "collectionType", "info": {"singularName": "query", "pluralName": "queries"}}"#,
        )
        .unwrap();
        let ct = ContentType::new(
            ContentTypeUid::new("query", "query"),
            schema,
            BTreeSet::from([Action::Find]),
            "http://localhost:1337",
        );
        assert!(generate_client(&[ct], &options(), &TypeScriptTarget).is_err());
    }

    #[test]
    fn test_global_type_names_are_protected() {
        for (singular, plural) in [
            ("record", "records"),
            ("promise", "promises"),
            ("partial", "partials"),
            ("object", "objects"),
        ] {
            let schema = parse_schema(&format!(
                r#"{{"kind": "collectionType", "info": {{"singularName": "{}", "pluralName": "{}"}}}}"#,
                singular, plural
            ))
            .unwrap();
            let ct = ContentType::new(
                ContentTypeUid::new(singular, singular),
                schema,
                BTreeSet::from([Action::FindOne]),
                "http://localhost:1337",
            );
            let err = generate_client(&[ct], &options(), &JavaScriptTarget).unwrap_err();
            assert!(
                format!("{}", err).contains(&format!("'{}'", singular.to_upper_camel_case())),
                "{} was not rejected",
                singular
            );
        }
    }

    #[test]
    fn test_content_type_without_usable_actions_is_skipped() {
        let code =
            generate_client(&[homepage(&[Action::Create])], &options(), &TypeScriptTarget).unwrap();
        assert!(!code.contains("Homepage"));
    }

    #[test]
    fn test_render_reports_emitted_actions() {
        let rendered = render_client(
            &[
                homepage(&[Action::FindOne, Action::Create]),
                article(&[Action::Find, Action::Delete]),
            ],
            &options(),
            &TypeScriptTarget,
        )
        .unwrap();
        assert_eq!(
            rendered.emitted,
            vec![(
                ContentTypeUid::new("blog", "blog-post"),
                vec![Action::Find, Action::Delete]
            )]
        );

        let rendered =
            render_client(&[homepage(&Action::ALL)], &options(), &JavaScriptTarget).unwrap();
        assert_eq!(
            rendered.emitted,
            vec![(
                ContentTypeUid::new("homepage", "homepage"),
                vec![Action::Find, Action::Update, Action::Delete]
            )]
        );
    }

    #[test]
    fn test_javascript_enum_values_cannot_close_doc_comments() {
        let schema = parse_schema(
            r#"{"kind": "collectionType", "info": {"singularName": "note", "pluralName": "notes"},
                "attributes": {"mood": {"type": "enumeration", "enum": ["a*/b", "calm"]}}}"#,
        )
        .unwrap();
        let ct = ContentType::new(
            ContentTypeUid::new("note", "note"),
            schema,
            BTreeSet::from([Action::Create]),
            "http://localhost:1337",
        );
        let code = generate_client(&[ct], &options(), &JavaScriptTarget).unwrap();
        assert!(code.contains(" * @property {\"a*\\/b\" | \"calm\"} [mood]"));
        assert!(!code.contains("a*/b"));
    }

    #[test]
    fn test_literal_helpers() {
        assert_eq!(js_string("a\"b\n"), "\"a\\\"b\\n\"");
        assert_eq!(property_key("title"), "title");
        assert_eq!(property_key("hero-image"), "\"hero-image\"");
        assert_eq!(property_key("2fa"), "\"2fa\"");
        assert_eq!(comment_text("a */ b"), "a *\\/ b");
    }
}

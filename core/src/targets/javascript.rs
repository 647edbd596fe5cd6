#![deny(missing_docs)]

//! # JavaScript Target
//!
//! Plain ES module. Types are carried in JSDoc so editors still get completion.

use super::{data_type, endpoint_comment, response_type, type_expr, ClientTarget};
use crate::codegen::{comment_text, js_string, ClientOptions, Entity, Operation, TokenBinding};

const RUNTIME: &str = r#"/** @typedef {number | string} Id */

/** @typedef {Record<string, string | number | boolean>} Query */

/**
 * @template T
 * @typedef {{ data: T, meta?: Record<string, unknown> }} StrapiResponse
 */

async function request(method, path, body, query) {
  const url = new URL(path, BASE_URL);
  for (const [key, value] of Object.entries(query ?? {})) {
    url.searchParams.set(key, String(value));
  }
  const response = await fetch(url, {
    method,
    headers: {
      Authorization: `Bearer ${API_TOKEN}`,
      "Content-Type": "application/json",
    },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  if (!response.ok) {
    throw new Error(`${method} ${path} failed with status ${response.status}`);
  }
  if (response.status === 204) {
    return undefined;
  }
  return response.json();
}
"#;

/// Emits a `.js` module.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaScriptTarget;

impl ClientTarget for JavaScriptTarget {
    fn file_extension(&self) -> &'static str {
        "js"
    }

    fn prelude(&self, options: &ClientOptions) -> String {
        let token = match &options.token {
            TokenBinding::Embedded(key) => js_string(key),
            TokenBinding::Environment(var) => format!("process.env[{}] ?? \"\"", js_string(var)),
        };
        format!(
            "// Generated by strapi-gen. Do not edit by hand.\n\n\
             const BASE_URL = {};\n\
             const API_TOKEN = {};\n\n\
             {}",
            js_string(&options.base_url),
            token,
            RUNTIME
        )
    }

    fn entity(&self, entity: &Entity) -> String {
        let mut code = String::from("/**\n");
        if let Some(summary) = &entity.summary {
            code.push_str(&format!(" * {}\n", comment_text(summary)));
        }
        code.push_str(&format!(" * {}\n", comment_text(&entity.uid)));
        code.push_str(&format!(" * @typedef {{Object}} {}\n", entity.input_name));
        for field in &entity.fields {
            let name = comment_text(&field.name);
            let name = if field.required {
                name
            } else {
                format!("[{}]", name)
            };
            code.push_str(&format!(
                " * @property {{{}}} {}\n",
                comment_text(&type_expr(&field.kind)),
                name
            ));
        }
        code.push_str(" */\n\n");
        code.push_str(&format!(
            "/** @typedef {{{} & {{ id: number, documentId?: string }}}} {} */\n",
            entity.input_name, entity.name
        ));
        code
    }

    fn function_open(&self, op: &Operation) -> String {
        let mut doc = vec![comment_text(&endpoint_comment(op))];
        let mut params = Vec::new();
        if op.by_id {
            doc.push("@param {Id} id".to_string());
            params.push("id");
        }
        if let Some(ty) = data_type(op) {
            doc.push(format!("@param {{{}}} data", comment_text(&ty)));
            params.push("data");
        }
        if op.accepts_query {
            doc.push("@param {Query} [query]".to_string());
            params.push("query");
        }
        doc.push(format!(
            "@returns {{Promise<{}>}}",
            comment_text(&response_type(op))
        ));

        let mut code = String::from("/**\n");
        for line in doc {
            code.push_str(&format!(" * {}\n", line));
        }
        code.push_str(" */\n");
        code.push_str(&format!(
            "export async function {}({}) {{\n",
            op.function_name,
            params.join(", ")
        ));
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::BodyShape;
    use crate::permissions::Action;
    use crate::type_mapping::{Field, FieldKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_with_jsdoc() {
        let op = Operation {
            action: Action::Find,
            function_name: "findArticles".into(),
            method: "GET",
            path: "/api/articles".into(),
            by_id: false,
            body: None,
            accepts_query: true,
            entity: "Article".into(),
            input: "ArticleInput".into(),
            returns_list: true,
        };
        assert_eq!(
            JavaScriptTarget.function_open(&op),
            "/**\n * GET /api/articles\n * @param {Query} [query]\n \
             * @returns {Promise<StrapiResponse<Article[]>>}\n */\n\
             export async function findArticles(query) {\n"
        );
    }

    #[test]
    fn test_create_takes_full_input() {
        let op = Operation {
            action: Action::Create,
            function_name: "createArticle".into(),
            method: "POST",
            path: "/api/articles".into(),
            by_id: false,
            body: Some(BodyShape::Full),
            accepts_query: false,
            entity: "Article".into(),
            input: "ArticleInput".into(),
            returns_list: false,
        };
        let code = JavaScriptTarget.function_open(&op);
        assert!(code.contains(" * @param {ArticleInput} data\n"));
        assert!(code.ends_with("export async function createArticle(data) {\n"));
    }

    #[test]
    fn test_entity_escapes_enum_values_in_jsdoc() {
        let entity = Entity {
            name: "Note".into(),
            input_name: "NoteInput".into(),
            uid: "api::note.note".into(),
            summary: None,
            fields: vec![Field {
                name: "mood".into(),
                kind: FieldKind::Enumeration(vec!["a*/b".into()]),
                required: true,
            }],
        };
        let code = JavaScriptTarget.entity(&entity);
        assert!(code.contains(" * @property {\"a*\\/b\"} mood\n"));
        assert!(!code.contains("a*/b"));
        assert_eq!(code.matches("*/").count(), 2);
    }

    #[test]
    fn test_prelude_reads_env() {
        let prelude = JavaScriptTarget.prelude(&ClientOptions {
            base_url: "http://localhost:1337".into(),
            token: TokenBinding::Environment("CMS_TOKEN".into()),
        });
        assert!(prelude.contains("const API_TOKEN = process.env[\"CMS_TOKEN\"] ?? \"\";\n"));
        assert!(prelude.contains("async function request(method, path, body, query) {"));
    }
}

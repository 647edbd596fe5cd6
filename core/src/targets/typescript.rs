#![deny(missing_docs)]

//! # TypeScript Target

use super::{data_type, endpoint_comment, response_type, type_expr, ClientTarget};
use crate::codegen::{
    comment_text, js_string, property_key, ClientOptions, Entity, Operation, TokenBinding,
};

const RUNTIME: &str = r#"export type Id = number | string;

export type Query = Record<string, string | number | boolean>;

export interface StrapiResponse<T> {
  data: T;
  meta?: Record<string, unknown>;
}

async function request<T>(method: string, path: string, body?: unknown, query?: Query): Promise<T> {
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
    return undefined as T;
  }
  return (await response.json()) as T;
}
"#;

/// Emits a `.ts` module.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptTarget;

impl ClientTarget for TypeScriptTarget {
    fn file_extension(&self) -> &'static str {
        "ts"
    }

    fn prelude(&self, options: &ClientOptions) -> String {
        let token = match &options.token {
            TokenBinding::Embedded(key) => js_string(key),
            TokenBinding::Environment(var) => format!("process.env[{}] ?? \"\"", js_string(var)),
        };
        format!(
            "// Generated by strapi-gen. Do not edit by hand.\n\n\
             const BASE_URL = {};\n\
             const API_TOKEN: string = {};\n\n\
             {}",
            js_string(&options.base_url),
            token,
            RUNTIME
        )
    }

    fn entity(&self, entity: &Entity) -> String {
        let mut code = String::new();
        match &entity.summary {
            Some(summary) => code.push_str(&format!(
                "/** {} ({}) */\n",
                comment_text(summary),
                comment_text(&entity.uid)
            )),
            None => code.push_str(&format!("/** {} */\n", comment_text(&entity.uid))),
        }

        code.push_str(&format!("export interface {} {{\n", entity.input_name));
        for field in &entity.fields {
            let optional = if field.required { "" } else { "?" };
            code.push_str(&format!(
                "  {}{}: {};\n",
                property_key(&field.name),
                optional,
                type_expr(&field.kind)
            ));
        }
        code.push_str("}\n\n");

        code.push_str(&format!(
            "export type {} = {} & {{\n  id: number;\n  documentId?: string;\n}};\n",
            entity.name, entity.input_name
        ));
        code
    }

    fn function_open(&self, op: &Operation) -> String {
        let mut params = Vec::new();
        if op.by_id {
            params.push("id: Id".to_string());
        }
        if let Some(ty) = data_type(op) {
            params.push(format!("data: {}", ty));
        }
        if op.accepts_query {
            params.push("query?: Query".to_string());
        }

        format!(
            "/** {} */\nexport async function {}({}): Promise<{}> {{\n",
            comment_text(&endpoint_comment(op)),
            op.function_name,
            params.join(", "),
            response_type(op)
        )
    }
}

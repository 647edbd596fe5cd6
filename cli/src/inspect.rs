//! # Inspect Command
//!
//! Read-only view of what a token can reach.

use crate::args::ProjectArgs;
use strapi_gen_core::{inspect, AppResult, Inspection};

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    #[clap(flatten)]
    pub project: ProjectArgs,
}

/// Renders the inspection as plain text, one content type per line.
pub fn render(inspection: &Inspection) -> String {
    let mut out = format!(
        "token {} (id {}, {})\n",
        inspection.token.name, inspection.token.id, inspection.token.kind
    );
    for ct in &inspection.content_types {
        let actions: Vec<&str> = ct.actions.iter().map(|a| a.as_str()).collect();
        out.push_str(&format!("{}  {}  [{}]\n", ct.uid, ct.url, actions.join(", ")));
    }
    out
}

/// Prints the content types and actions the token grants.
pub fn execute(args: &InspectArgs) -> AppResult<()> {
    let inspection = inspect(&args.project.project())?;
    print!("{}", render(&inspection));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use strapi_gen_core::schema::parse_schema;
    use strapi_gen_core::{Action, ApiToken, ContentType, ContentTypeUid, TokenKind};

    #[test]
    fn test_render() {
        let schema = parse_schema(
            r#"{"kind": "collectionType", "info": {"singularName": "article", "pluralName": "articles"}}"#,
        )
        .unwrap();
        let inspection = Inspection {
            token: ApiToken {
                id: 3,
                name: "agent".into(),
                kind: TokenKind::Custom,
            },
            content_types: vec![ContentType::new(
                ContentTypeUid::new("article", "article"),
                schema,
                BTreeSet::from([Action::Create, Action::Find]),
                "http://localhost:1337",
            )],
        };

        assert_eq!(
            render(&inspection),
            "token agent (id 3, custom)\n\
             api::article.article  http://localhost:1337/api/articles  [find, create]\n"
        );
    }
}

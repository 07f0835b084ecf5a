//! Mustache section semantics for handlebars blocks.

use handlebars::{
    to_json, BlockContext, Context, Handlebars, Helper, HelperDef, HelperResult, JsonTruthy,
    Output, RenderContext, RenderError, Renderable,
};
use serde_json::Value;

/// Name handlebars dispatches to for a block whose name is not a helper.
pub(crate) const BLOCK_HELPER_MISSING: &str = "blockHelperMissing";

/// Renders `{{#name}}…{{/name}}` by looking `name` up in the data.
///
/// A non-empty list repeats the body once per element, with the element as
/// context. A non-empty object renders the body once with the object as
/// context. Any other truthy value renders the body once in the current
/// context. Falsy or missing values render the inverse block, if any.
#[derive(Clone, Copy)]
pub(crate) struct SectionHelper;

impl HelperDef for SectionHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = rc.evaluate(ctx, h.name())?;
        if value.is_missing() && r.strict_mode() {
            return Err(RenderError::strict_error(Some(&h.name().to_owned())));
        }
        let base_path = value.context_path();

        match value.as_json() {
            Value::Array(items) if !items.is_empty() => {
                let Some(template) = h.template() else {
                    return Ok(());
                };
                let last = items.len() - 1;
                for (i, item) in items.iter().enumerate() {
                    let mut block = scoped_block(base_path, Some(i), item);
                    block.set_local_var("index", to_json(i));
                    block.set_local_var("first", to_json(i == 0));
                    block.set_local_var("last", to_json(i == last));
                    render_in_block(template, block, r, ctx, rc, out)?;
                }
                Ok(())
            }
            Value::Object(map) if !map.is_empty() => match h.template() {
                Some(template) => {
                    let block = scoped_block(base_path, None, value.as_json());
                    render_in_block(template, block, r, ctx, rc, out)
                }
                None => Ok(()),
            },
            scalar if !matches!(scalar, Value::Array(_) | Value::Object(_))
                && scalar.is_truthy(false) =>
            {
                match h.template() {
                    Some(template) => template.render(r, ctx, rc, out),
                    None => Ok(()),
                }
            }
            _ => match h.inverse() {
                Some(inverse) => inverse.render(r, ctx, rc, out),
                None => Ok(()),
            },
        }
    }
}

/// Block whose context is `value`, addressed by path when it came from the data.
fn scoped_block<'rc>(
    base_path: Option<&Vec<String>>,
    index: Option<usize>,
    value: &Value,
) -> BlockContext<'rc> {
    let mut block = BlockContext::new();
    match base_path {
        Some(path) => {
            let mut scoped = path.clone();
            if let Some(i) = index {
                scoped.push(i.to_string());
            }
            *block.base_path_mut() = scoped;
        }
        None => block.set_base_value(value.clone()),
    }
    block
}

fn render_in_block<'reg: 'rc, 'rc>(
    template: &'rc handlebars::Template,
    block: BlockContext<'rc>,
    r: &'reg Handlebars<'reg>,
    ctx: &'rc Context,
    rc: &mut RenderContext<'reg, 'rc>,
    out: &mut dyn Output,
) -> HelperResult {
    rc.push_block(block);
    let result = template.render(r, ctx, rc, out);
    rc.pop_block();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        registry.set_recursive_lookup(true);
        registry.register_helper(BLOCK_HELPER_MISSING, Box::new(SectionHelper));
        registry
    }

    #[test]
    fn test_list_repeats_body() {
        let out = registry()
            .render_template(
                "[{{#ITEMS}}<{{name}}>{{/ITEMS}}]",
                &json!({"ITEMS": [{"name": "a"}, {"name": "b"}]}),
            )
            .unwrap();
        assert_eq!(out, "[<a><b>]");
    }

    #[test]
    fn test_empty_and_falsy_values_skip_body() {
        let registry = registry();
        for data in [
            json!({"ITEMS": []}),
            json!({"ITEMS": false}),
            json!({"ITEMS": null}),
            json!({"ITEMS": {}}),
            json!({"ITEMS": ""}),
            json!({}),
        ] {
            let out = registry
                .render_template("[{{#ITEMS}}body{{/ITEMS}}]", &data)
                .unwrap();
            assert_eq!(out, "[]", "data: {}", data);
        }
    }

    #[test]
    fn test_object_becomes_context() {
        let out = registry()
            .render_template(
                "{{#CUSTOMER}}{{name}} ({{city}}){{/CUSTOMER}}",
                &json!({"CUSTOMER": {"name": "Ann", "city": "Oslo"}}),
            )
            .unwrap();
        assert_eq!(out, "Ann (Oslo)");
    }

    #[test]
    fn test_truthy_scalar_renders_once_in_outer_context() {
        let out = registry()
            .render_template(
                "{{#VIP}}Dear {{NAME}}{{/VIP}}",
                &json!({"VIP": true, "NAME": "Ann"}),
            )
            .unwrap();
        assert_eq!(out, "Dear Ann");
    }

    #[test]
    fn test_outer_names_visible_inside_list() {
        let out = registry()
            .render_template(
                "{{#ROWS}}{{CURRENCY}}{{amount}};{{/ROWS}}",
                &json!({"CURRENCY": "$", "ROWS": [{"amount": 1}, {"amount": 2}]}),
            )
            .unwrap();
        assert_eq!(out, "$1;$2;");
    }

    #[test]
    fn test_nested_sections() {
        let out = registry()
            .render_template(
                "{{#GROUPS}}{{title}}:{{#members}}{{this}},{{/members}}|{{/GROUPS}}",
                &json!({"GROUPS": [
                    {"title": "x", "members": ["a", "b"]},
                    {"title": "y", "members": ["c"]}
                ]}),
            )
            .unwrap();
        assert_eq!(out, "x:a,b,|y:c,|");
    }

    #[test]
    fn test_strict_mode_rejects_missing_section() {
        let mut registry = registry();
        registry.set_strict_mode(true);
        assert!(registry
            .render_template("{{#ITEMS}}x{{/ITEMS}}", &json!({}))
            .is_err());
    }
}

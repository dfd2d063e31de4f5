use minijinja::{Environment, context};

use super::item::SpecItem;

const TEMPLATE_NAME: &str = "operation_description";

// No trailing newline: the rendered text is embedded as-is.
const TEMPLATE: &str = "{{ description }}\n<pre>\n{{ query|escape_pre }}\n</pre>\
{% if projection %}JSON results are projected according to: \n<pre>\n{{ projection|escape_pre }}\n</pre>{% endif %}";

/// Escape text for an HTML `<pre>` block. Quotes are left alone.
fn escape_pre(value: String) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders operation descriptions: the declared description followed by the
/// query text and optional projection as preformatted blocks.
pub struct DescriptionRenderer {
    env: Environment<'static>,
}

impl DescriptionRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_filter("escape_pre", escape_pre);
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, item: &SpecItem) -> Result<String, minijinja::Error> {
        self.env.get_template(TEMPLATE_NAME)?.render(context! {
            description => item.description,
            query => item.query,
            projection => item.projection,
        })
    }
}

//! Template environment. Templates are compiled into the binary.

use axum::response::Html;
use minijinja::Environment;
use mercantil_common::money::format_money;
use serde::Serialize;

use crate::error::Result;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("analytics.html", include_str!("../templates/analytics.html")),
    ("customers/list.html", include_str!("../templates/customers/list.html")),
    ("customers/form.html", include_str!("../templates/customers/form.html")),
    ("products/list.html", include_str!("../templates/products/list.html")),
    ("products/form.html", include_str!("../templates/products/form.html")),
    ("suppliers/list.html", include_str!("../templates/suppliers/list.html")),
    ("suppliers/form.html", include_str!("../templates/suppliers/form.html")),
    ("orders/list.html", include_str!("../templates/orders/list.html")),
    ("orders/form.html", include_str!("../templates/orders/form.html")),
    ("confirm_delete.html", include_str!("../templates/confirm_delete.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new(currency_symbol: &str) -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        let symbol = currency_symbol.to_string();
        env.add_filter("money", move |amount: f64| format_money(amount, &symbol));

        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_compile() {
        let views = Views::new("$").unwrap();
        for (name, _) in TEMPLATES {
            assert!(views.env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_money_filter_and_escaping() {
        let mut views = Views::new("€").unwrap();
        views
            .env
            .add_template("probe.html", "{{ amount|money }} {{ name }}")
            .unwrap();
        let Html(out) = views
            .render("probe.html", context! { amount => 12.5, name => "<b>" })
            .unwrap();
        assert_eq!(out, "€12.50 &lt;b&gt;");
    }
}

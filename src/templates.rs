use handlebars::{Handlebars, TemplateError};

pub const GREETING: &str = "replies/greeting";
pub const ASK_QUERY: &str = "replies/ask_query";
pub const CANCELLED: &str = "replies/cancelled";
pub const QUERY_TOO_LONG: &str = "replies/query_too_long";
pub const NO_RESULTS: &str = "replies/no_results";
pub const TOO_MANY_RESULTS: &str = "replies/too_many_results";
pub const CHOOSE_USER: &str = "replies/choose_user";
pub const CHOICE_RETRY: &str = "replies/choice_retry";
pub const DIALOG_ERROR: &str = "replies/dialog_error";

/// HTML pages served by the status controller.
pub fn page_registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("template", include_str!("templates/template.hbs"))?;
    handlebars.register_template_string("index", include_str!("templates/index.hbs"))?;
    Ok(handlebars)
}

/// Plain-text bot replies. Nothing is HTML-escaped since channels render markdown.
pub fn reply_registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.register_template_string(GREETING, include_str!("templates/replies/greeting.hbs"))?;
    handlebars.register_template_string(ASK_QUERY, include_str!("templates/replies/ask_query.hbs"))?;
    handlebars.register_template_string(CANCELLED, include_str!("templates/replies/cancelled.hbs"))?;
    handlebars.register_template_string(QUERY_TOO_LONG, include_str!("templates/replies/query_too_long.hbs"))?;
    handlebars.register_template_string(NO_RESULTS, include_str!("templates/replies/no_results.hbs"))?;
    handlebars.register_template_string(TOO_MANY_RESULTS, include_str!("templates/replies/too_many_results.hbs"))?;
    handlebars.register_template_string(CHOOSE_USER, include_str!("templates/replies/choose_user.hbs"))?;
    handlebars.register_template_string(CHOICE_RETRY, include_str!("templates/replies/choice_retry.hbs"))?;
    handlebars.register_template_string(DIALOG_ERROR, include_str!("templates/replies/dialog_error.hbs"))?;
    Ok(handlebars)
}

use std::borrow::Cow;

use modelgen_core::model::Model;

/// API name for `model`, or `None` if this backend cannot address it.
pub(crate) fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    match model {
        Model::OpenAi(openai_model) => Some(Cow::Borrowed(openai_model.as_str())),
        Model::Custom(custom) if custom.trim().is_empty() => None,
        Model::Custom(custom) => Some(custom.clone()),
    }
}

use crate::api::SetterFilterApi;
use crate::attributes::{AttributeSpec, TypeTag};
use crate::config::SetterFilterConfig;
use crate::model::{ModelDef, ModelId};
use crate::schema::Schema;
use crate::store::MemBackend;

/// The `my_models` table: `id`, `name` (string), `bio` (text), `address` (string).
pub fn my_models() -> ModelDef {
    ModelDef::new(
        "my_models",
        vec![
            AttributeSpec::new("id", TypeTag::Integer),
            AttributeSpec::new("name", TypeTag::String),
            AttributeSpec::new("bio", TypeTag::Text),
            AttributeSpec::new("address", TypeTag::String),
        ],
    )
}

pub struct TestEnv {
    pub api: SetterFilterApi<Schema, MemBackend>,
    pub model: ModelId,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(SetterFilterConfig::default())
    }

    pub fn with_config(config: SetterFilterConfig) -> Self {
        let def = my_models();
        let model = def.name.clone();
        let mut schema = Schema::new();
        schema.define(def);
        Self {
            api: SetterFilterApi::new(schema, MemBackend::new(), config),
            model,
        }
    }
}

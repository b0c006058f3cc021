//! Lookup of function definitions by identifier.

use std::{collections::HashMap, sync::OnceLock};

use tracing::debug;
use verdict_contracts::datatype::DataType;

use crate::{
    bag::BagOp,
    comparison::Comparison,
    date_arithmetic::DateArithmeticOp,
    definition::{FunctionDefinition, FunctionKind},
    logical::LogicalOp,
    set::SetOp,
    string_normalize::NormalizeOp,
};

/// Function definitions keyed by full identifier.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDefinition>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry holding every standard function.
    pub fn standard() -> &'static FunctionRegistry {
        static STANDARD: OnceLock<FunctionRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let registry = Self::standard_kinds()
                .into_iter()
                .fold(Self::new(), |mut r, kind| {
                    r.register(FunctionDefinition::new(kind));
                    r
                });
            debug!(functions = registry.len(), "standard function registry built");
            registry
        })
    }

    fn standard_kinds() -> Vec<FunctionKind> {
        let mut kinds: Vec<FunctionKind> = LogicalOp::ALL.into_iter().map(FunctionKind::Logical).collect();
        for dt in DataType::ALL {
            kinds.push(FunctionKind::Equal(dt));
            kinds.extend(BagOp::ALL.into_iter().map(|op| FunctionKind::Bag(dt, op)));
            kinds.extend(SetOp::ALL.into_iter().map(|op| FunctionKind::Set(dt, op)));
        }
        for dt in Comparison::ORDERED_TYPES {
            kinds.extend(Comparison::ALL.into_iter().map(|c| FunctionKind::Compare(dt, c)));
        }
        kinds.extend(DateArithmeticOp::ALL.into_iter().map(FunctionKind::DateArithmetic));
        kinds.extend(NormalizeOp::ALL.into_iter().map(FunctionKind::StringNormalize));
        kinds
    }

    /// Add `definition`, replacing any definition with the same id.
    pub fn register(&mut self, definition: FunctionDefinition) {
        self.functions.insert(definition.id().to_string(), definition);
    }

    pub fn get(&self, id: &str) -> Option<&FunctionDefinition> {
        self.functions.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

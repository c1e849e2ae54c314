//! Diagnosis profile and the personalization derived from it.

mod personalization;
mod profile;

pub use personalization::{
    communication_style, constitution_approach, extract_concern, judgment_bias, thinking_style,
    PersonalizationContext, ThinkingStyle, DEFAULT_CONCERN, DEFAULT_JUDGMENT_BIAS,
};
pub use profile::{ConstitutionType, DiagnosisProfile, FortuneTraits, PersonalityType};

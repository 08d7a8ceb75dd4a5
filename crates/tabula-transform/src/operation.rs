//! Typed transform descriptors.
//!
//! An [`Operation`](tabula_model::Operation) carries a string type and a JSON
//! parameter bag. The dispatcher parses that pair into one of these variants
//! before anything runs, so a malformed request fails before touching data.

use crate::boolean::FillBooleanParams;
use crate::categorical::{
    AssignDefaultParams, EncodeParams, GroupRareParams, MergeCategoriesParams,
    RenameCategoriesParams, SplitCategoriesParams,
};
use crate::columns::{DuplicateColumnParams, RenameColumnParams};
use crate::datetime::{
    DatetimeArithmeticParams, DatetimeCombineParams, DatetimeExtractParams, DatetimeFormatParams,
    DatetimeTimezoneParams, DatetimeTruncateParams,
};
use crate::mapping::AdvancedMappingParams;
use crate::missing::FillMissingParams;
use crate::numeric::binning::BinParams;
use crate::numeric::normalize::NormalizeParams;
use crate::numeric::{
    ArithmeticParams, ConvertParams, MathParams, RoundParams, ValidateParams,
};
use crate::text::{
    ChangeCaseParams, ConcatenateParams, ExtractSubstringParams, FindReplaceParams, PadTextParams,
    RemoveCharactersParams, SplitColumnParams, TrimParams,
};

/// Sub-operation of `numeric_transform`, selected by `transformType`.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericTransform {
    Round(RoundParams),
    Arithmetic(ArithmeticParams),
    Math(MathParams),
    Normalize(NormalizeParams),
    Bin(BinParams),
    Validate(ValidateParams),
    Convert(ConvertParams),
}

impl NumericTransform {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Round(_) => "round",
            Self::Arithmetic(_) => "arithmetic",
            Self::Math(_) => "math",
            Self::Normalize(_) => "normalize",
            Self::Bin(_) => "bin",
            Self::Validate(_) => "validate",
            Self::Convert(_) => "convert",
        }
    }
}

/// A parsed column transform.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Transform {
    Numeric(NumericTransform),

    /// Fill `Null` cells.
    FillMissing(FillMissingParams),
    RenameColumn(RenameColumnParams),
    DeleteColumn,
    DuplicateColumn(DuplicateColumnParams),

    Trim(TrimParams),
    ChangeCase(ChangeCaseParams),
    FindReplace(FindReplaceParams),
    SplitColumn(SplitColumnParams),
    /// Join with a second column into a new column.
    Concatenate(ConcatenateParams),
    ExtractSubstring(ExtractSubstringParams),
    PadText(PadTextParams),
    RemoveCharacters(RemoveCharactersParams),

    RenameCategories(RenameCategoriesParams),
    MergeCategories(MergeCategoriesParams),
    SplitCategories(SplitCategoriesParams),
    EncodeCategorical(EncodeParams),
    GroupRare(GroupRareParams),
    /// Fill null and empty-sentinel cells.
    AssignDefault(AssignDefaultParams),

    BooleanTo01,
    InvertBoolean,
    FillBoolean(FillBooleanParams),

    DatetimeFormat(DatetimeFormatParams),
    DatetimeExtract(DatetimeExtractParams),
    DatetimeArithmetic(DatetimeArithmeticParams),
    DatetimeTruncate(DatetimeTruncateParams),
    DatetimeTimezone(DatetimeTimezoneParams),
    DatetimeCombine(DatetimeCombineParams),
    DatetimeSplit,

    /// Rule-set driven mapping into a target column.
    AdvancedMapping(AdvancedMappingParams),
}

impl Transform {
    /// The operation type string this variant was parsed from.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric_transform",
            Self::FillMissing(_) => "fill_missing",
            Self::RenameColumn(_) => "rename_column",
            Self::DeleteColumn => "delete_column",
            Self::DuplicateColumn(_) => "duplicate_column",
            Self::Trim(_) => "trim",
            Self::ChangeCase(_) => "change_case",
            Self::FindReplace(_) => "find_replace",
            Self::SplitColumn(_) => "split_column",
            Self::Concatenate(_) => "concatenate",
            Self::ExtractSubstring(_) => "extract_substring",
            Self::PadText(_) => "pad_text",
            Self::RemoveCharacters(_) => "remove_characters",
            Self::RenameCategories(_) => "rename_categories",
            Self::MergeCategories(_) => "merge_categories",
            Self::SplitCategories(_) => "split_categories",
            Self::EncodeCategorical(_) => "encode_categorical",
            Self::GroupRare(_) => "group_rare",
            Self::AssignDefault(_) => "assign_default",
            Self::BooleanTo01 => "boolean_to_01",
            Self::InvertBoolean => "invert_boolean",
            Self::FillBoolean(_) => "fill_boolean",
            Self::DatetimeFormat(_) => "datetime_format",
            Self::DatetimeExtract(_) => "datetime_extract",
            Self::DatetimeArithmetic(_) => "datetime_arithmetic",
            Self::DatetimeTruncate(_) => "datetime_truncate",
            Self::DatetimeTimezone(_) => "datetime_timezone",
            Self::DatetimeCombine(_) => "datetime_combine",
            Self::DatetimeSplit => "datetime_split",
            Self::AdvancedMapping(_) => "advanced_mapping",
        }
    }

    /// Returns true if the transform can add or remove columns.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::RenameColumn(_)
                | Self::DeleteColumn
                | Self::DuplicateColumn(_)
                | Self::SplitColumn(_)
                | Self::Concatenate(_)
                | Self::EncodeCategorical(_)
                | Self::DatetimeExtract(_)
                | Self::DatetimeCombine(_)
                | Self::DatetimeSplit
                | Self::AdvancedMapping(_)
        )
    }
}

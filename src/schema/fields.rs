// src/schema/fields.rs

/// Ordered `(raw code, descriptive name)` pairs. Declaration order is output order.
pub type FieldCodeMap = &'static [(&'static str, &'static str)];

/// Workplace/residence area characteristics columns.
pub static LONGFORM_FIELDS: FieldCodeMap = &[
    ("C000", "total_jobs"),
    ("CA01", "age_29_or_younger"),
    ("CA02", "age_30_to_54"),
    ("CA03", "age_55_or_older"),
    ("CE01", "wages_1250_or_less"),
    ("CE02", "wages_1251_to_3333"),
    ("CE03", "wages_3334_or_more"),
    ("CNS01", "agriculture_etc"),
    ("CNS02", "mining_etc"),
    ("CNS03", "utilities"),
    ("CNS04", "construction"),
    ("CNS05", "manufacturing"),
    ("CNS06", "wholesale_trade"),
    ("CNS07", "retail_trade"),
    ("CNS08", "transportation_warehousing"),
    ("CNS09", "information"),
    ("CNS10", "finance_insurance"),
    ("CNS11", "real_estate"),
    ("CNS12", "technical_services"),
    ("CNS13", "management"),
    ("CNS14", "waste_management"),
    ("CNS15", "educational_services"),
    ("CNS16", "healthcare_social_services"),
    ("CNS17", "arts_entertainment_recreation"),
    ("CNS18", "accommodation_food_services"),
    ("CNS19", "other_services"),
    ("CNS20", "public_administration"),
    ("CR01", "white_alone"),
    ("CR02", "black_alone"),
    ("CR03", "american_indian_and_alaska_native"),
    ("CR04", "asian_alone"),
    ("CR05", "native_hawaiian_and_pacific_islander"),
    ("CR07", "two_or_more_races"),
    ("CT01", "not_latino"),
    ("CT02", "latino_alone"),
    ("CD01", "less_than_high_school"),
    ("CD02", "high_school_graduate"),
    ("CD03", "some_college"),
    ("CD04", "bachelors_or_higher"),
    ("CS01", "total_jobs_male"),
    ("CS02", "total_jobs_female"),
    ("CFA01", "firm_age_0_to_1"),
    ("CFA02", "firm_age_2_to_3"),
    ("CFA03", "firm_age_4_to_5"),
    ("CFA04", "firm_age_6_to_10"),
    ("CFA05", "firm_age_11_or_more"),
    ("CFS01", "firm_size_0_to_19"),
    ("CFS02", "firm_size_20_to_49"),
    ("CFS03", "firm_size_50_to_249"),
    ("CFS04", "firm_size_250_to_499"),
    ("CFS05", "firm_size_500_or_more"),
];

/// Origin-destination count columns. Names are suffixes: the output column is
/// `<resident class>_<name>`.
pub static OD_FIELDS: FieldCodeMap = &[
    ("S000", "total"),
    ("SA01", "29_or_younger"),
    ("SA02", "30_to_54"),
    ("SA03", "55_or_older"),
    ("SE01", "1250_or_less"),
    ("SE02", "1251_to_3333"),
    ("SE03", "3334_or_more"),
    ("SI01", "goods_producing"),
    ("SI02", "trade_transpo_utilities"),
    ("SI03", "all_other_industries"),
];

/// Prefix shared by every OD count column.
pub const OD_COUNT_PREFIX: char = 'S';

/// Catalog entries whose code appears in `present`, in catalog order.
/// Columns the catalog does not know are ignored.
pub fn resolve<S: AsRef<str>>(
    catalog: FieldCodeMap,
    present: &[S],
) -> Vec<(&'static str, &'static str)> {
    catalog
        .iter()
        .filter(|(code, _)| present.iter().any(|p| p.as_ref() == *code))
        .copied()
        .collect()
}

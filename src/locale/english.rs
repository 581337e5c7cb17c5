//! English form names, report text and prompt.

use super::{Field, ReportText};

pub(super) static TEXT: ReportText = ReportText {
    title: "Manzili Energy Audit Service Report",
    report_number_prefix: "Report Number: ",
    overview_heading: "Overview",
    overview: "This report summarizes the results and recommendations following the energy audit \
               conducted in your home as part of the Manzili home energy consultancy service in \
               Ras Al Khaimah. The goal of the audit is to help reduce your electricity and water \
               bills and make your home more comfortable and modern.",
    audit_heading: "Audit Details",
    notes_heading: "Notes",
    recommendations_heading: "Recommendations",
    narrative_heading: "AI-Generated Recommendations",
    disclaimer_heading: "Disclaimer",
    item_header: "Item",
    details_header: "Details",
    recommendation_headers: ["Recommendations", "Benefits", "Implementation"],
    tier_labels: ["High Priority", "Medium Priority", "Low Priority"],
    detail_joiner: " in ",
    fallback_narrative: "Unable to generate recommendations due to model initialization error.",
    disclaimers: [
        "This report is based on visual observations of the main equipment related to energy and \
         water in your home by the Ras Al Khaimah Municipality. The observations do not include \
         any detailed measurements or analyses.",
        "Potential savings indicated in the report are estimates and not guaranteed. There is no \
         obligation to implement any recommendations, and the Ras Al Khaimah Municipality will \
         not be liable for any actions taken by the homeowner or any other party.",
        "The information provided is based on available data from the Ras Al Khaimah \
         Municipality and recommended suppliers and contractors. The municipality welcomes \
         feedback on the listed companies and suggestions for new companies to be added to the \
         list. For any suggestions, please email manzily@mun.rak.ae.",
    ],
};

pub(super) const PROMPT_TEMPLATE: &str = "\
Based on the following energy audit data, provide 5-7 specific recommendations for saving power \
and improving energy efficiency:

{facts}

Please provide actionable and specific recommendations, benefits and implementation. Format the \
recommendations as a bullet point list under the following headings.
AC-System:

Lighting:

Water Taps:

Water Heaters:

Other Observations:

Do not write anything before this and don't bold any sentences/words with **. Use - to bullet \
and don't use brackets anywhere.";

pub(super) fn field_key(field: Field) -> &'static str {
    match field {
        Field::ReportNumber => "report_number",
        Field::DateOfAudit => "date_of_audit",
        Field::Homeowner => "homeowner",
        Field::ContactNumber => "contact_number",
        Field::Location => "location",
        Field::TypeOfAccommodation => "type_of_accommodation",
        Field::HouseNumber => "house_number",
        Field::YearOfConstruction => "year_of_construction",
        Field::NumberOfBedrooms => "number_of_bedrooms",
        Field::NumberOfFloors => "number_of_floors",
        Field::NumberOfResidents => "number_of_residents",
        Field::OutdoorGarden => "outdoor_garden",
        Field::SwimmingPool => "swimming_pool",
        Field::AcSystems => "ac_systems",
        Field::Lighting => "lighting",
        Field::WaterTaps => "water_taps",
        Field::WaterHeaters => "water_heaters",
        Field::Other => "other",
    }
}

pub(super) fn field_label(field: Field) -> &'static str {
    match field {
        Field::ReportNumber => "Report Number",
        Field::DateOfAudit => "Date Of Audit",
        Field::Homeowner => "Homeowner",
        Field::ContactNumber => "Contact Number",
        Field::Location => "Location",
        Field::TypeOfAccommodation => "Type Of Accommodation",
        Field::HouseNumber => "House Number",
        Field::YearOfConstruction => "Year Of Construction",
        Field::NumberOfBedrooms => "Number Of Bedrooms",
        Field::NumberOfFloors => "Number Of Floors",
        Field::NumberOfResidents => "Number Of Residents",
        Field::OutdoorGarden => "Outdoor Garden",
        Field::SwimmingPool => "Swimming Pool",
        Field::AcSystems => "AC Systems",
        Field::Lighting => "Lighting",
        Field::WaterTaps => "Water Taps",
        Field::WaterHeaters => "Water Heaters",
        Field::Other => "Other",
    }
}

pub(super) fn prompt_label(field: Field) -> &'static str {
    match field {
        Field::TypeOfAccommodation => "Accommodation",
        Field::AcSystems => "Air Conditioning Systems",
        Field::Other => "Other Notes",
        other => field_label(other),
    }
}

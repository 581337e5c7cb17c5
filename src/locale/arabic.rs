//! Arabic form names, report text and prompt.

use super::{Field, ReportText};

pub(super) static TEXT: ReportText = ReportText {
    title: "تقرير منزلي لخدمة تدقيق الطاقة المنزلية",
    report_number_prefix: "رقم التقرير: ",
    overview_heading: "نظرة عامة",
    overview: "يُلخص هذا التقرير النتائج والتوصيات بعد تدقيق الطاقة الذي أُجري في منزلك كجزء من \
               خدمة استشارات طاقة منزلي في رأس الخيمة. الهدف من التدقيق هو المساعدة في تقليل \
               فواتير الكهرباء والمياه وجعل منزلك أكثر راحة وحداثة.",
    audit_heading: "تفاصيل التدقيق",
    notes_heading: "الملاحظات",
    recommendations_heading: "التوصيات",
    narrative_heading: "التوصيات المولّدة بواسطة الذكاء الاصطناعي",
    disclaimer_heading: "تنويه",
    item_header: "العنصر",
    details_header: "التفاصيل",
    recommendation_headers: ["التوصية", "الفوائد", "التنفيذ"],
    tier_labels: ["أولوية قصوى", "أولوية متوسطة", "أولوية منخفضة"],
    detail_joiner: " في ",
    fallback_narrative: "تعذر إنشاء التوصيات بسبب خطأ في تهيئة النموذج.",
    disclaimers: [
        "يستند هذا التقرير إلى الملاحظات البصرية للمعدات الرئيسية المتعلقة بالطاقة والمياه في \
         منزلك من قبل بلدية رأس الخيمة. لا تشمل الملاحظات أي قياسات أو تحاليل مفصلة.",
        "المدخرات المحتملة المشار إليها في التقرير هي تقديرات وليست مضمونة. لا يوجد التزام \
         بتنفيذ أي توصيات، ولن تكون بلدية رأس الخيمة مسؤولة عن أي إجراءات يتخذها صاحب المنزل \
         أو أي طرف آخر.",
        "المعلومات المقدمة تستند إلى البيانات المتاحة من بلدية رأس الخيمة والموردين والمقاولين \
         الموصى بهم. ترحب البلدية بالتعليقات حول الشركات المدرجة والاقتراحات لإضافة شركات جديدة \
         إلى القائمة. لأي اقتراحات، يرجى إرسال بريد إلكتروني إلى manzily@mun.rak.ae.",
    ],
};

pub(super) const PROMPT_TEMPLATE: &str = "\
استنادًا إلى بيانات تدقيق الطاقة التالية، قدم 5-7 توصيات محددة لتوفير الطاقة وتحسين كفاءة الطاقة:

{facts}

يرجى تقديم توصيات محددة وقابلة للتنفيذ، الفوائد والتنفيذ. قم بتنسيق التوصيات على شكل قائمة نقطية \
تحت العناوين التالية.
نظام التكييف:

الإضاءة:

الحنفيات:

سخانات المياه:

ملاحظات أخرى:

لا تكتب أي شيء قبل هذا ولا تجعل أي جمل/كلمات غامقة. استخدم - للتنقيط ولا تستخدم أقواس في أي مكان.";

pub(super) fn field_key(field: Field) -> &'static str {
    match field {
        Field::ReportNumber => "رقم_التقرير",
        Field::DateOfAudit => "تاريخ_التدقيق",
        Field::Homeowner => "صاحب_المنزل",
        Field::ContactNumber => "رقم_الاتصال",
        Field::Location => "الموقع",
        Field::TypeOfAccommodation => "نوع_الإقامة",
        Field::HouseNumber => "رقم_المنزل",
        Field::YearOfConstruction => "سنة_البناء",
        Field::NumberOfBedrooms => "عدد_غرف_النوم",
        Field::NumberOfFloors => "عدد_الطوابق",
        Field::NumberOfResidents => "عدد_السكان",
        Field::OutdoorGarden => "حديقة_خارجية",
        Field::SwimmingPool => "حمام_سباحة",
        Field::AcSystems => "أنظمة_تكييف",
        Field::Lighting => "إضاءة",
        Field::WaterTaps => "حنفيات_المياه",
        Field::WaterHeaters => "سخانات_المياه",
        Field::Other => "أخرى",
    }
}

pub(super) fn field_label(field: Field) -> &'static str {
    match field {
        Field::ReportNumber => "رقم التقرير",
        Field::DateOfAudit => "تاريخ التدقيق",
        Field::Homeowner => "صاحب المنزل",
        Field::ContactNumber => "رقم الاتصال",
        Field::Location => "الموقع",
        Field::TypeOfAccommodation => "نوع الإقامة",
        Field::HouseNumber => "رقم المنزل",
        Field::YearOfConstruction => "سنة البناء",
        Field::NumberOfBedrooms => "عدد غرف النوم",
        Field::NumberOfFloors => "عدد الطوابق",
        Field::NumberOfResidents => "عدد السكان",
        Field::OutdoorGarden => "حديقة خارجية",
        Field::SwimmingPool => "حمام سباحة",
        Field::AcSystems => "أنظمة تكييف",
        Field::Lighting => "إضاءة",
        Field::WaterTaps => "حنفيات المياه",
        Field::WaterHeaters => "سخانات المياه",
        Field::Other => "أخرى",
    }
}

pub(super) fn prompt_label(field: Field) -> &'static str {
    match field {
        Field::AcSystems => "أنظمة تكييف الهواء",
        Field::Lighting => "الإضاءة",
        Field::Other => "ملاحظات أخرى",
        other => field_label(other),
    }
}

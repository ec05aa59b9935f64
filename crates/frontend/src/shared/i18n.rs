//! Locale context and translations.
//!
//! Arabic is the primary locale (RTL), English and Chinese are secondary.
//! The selection persists in localStorage and drives the `dir`/`lang`
//! attributes of the document root.

use std::collections::HashMap;

use leptos::prelude::*;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Ar,
    En,
    Zh,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    pub fn dir(self) -> &'static str {
        match self {
            Locale::Ar => "rtl",
            Locale::En | Locale::Zh => "ltr",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ar" => Some(Locale::Ar),
            "en" => Some(Locale::En),
            "zh" => Some(Locale::Zh),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Locale::Ar => 0,
            Locale::En => 1,
            Locale::Zh => 2,
        }
    }
}

// key -> [ar, en, zh]
static TABLE: &[(&str, [&str; 3])] = &[
    ("loading", ["جاري التحميل...", "Loading...", "加载中..."]),
    ("retry", ["إعادة المحاولة", "Retry", "重试"]),
    ("load_failed", ["حدث خطأ أثناء تحميل البيانات", "Failed to load data", "加载数据失败"]),
    ("no_products", ["لا توجد منتجات متاحة", "No products available", "暂无商品"]),
    ("available", ["متاح", "Available", "可售"]),
    ("reserved", ["محجوز", "Reserved", "已预订"]),
    ("sold_out", ["نفذت الكمية", "Sold out", "售罄"]),
    ("pieces_per_carton", ["قطعة في الكرتون", "pieces per carton", "件/箱"]),
    ("unit_price", ["سعر القطعة", "Unit price", "单价"]),
    ("cbm", ["الحجم (م³)", "CBM", "体积(m³)"]),
    ("total_cbm", ["إجمالي الحجم (م³)", "Total CBM", "总体积(m³)"]),
    ("negotiation_quantity", ["كمية التفاوض", "Negotiation quantity", "议价数量"]),
    ("negotiation_price", ["سعر التفاوض", "Negotiation price", "议价单价"]),
    ("enter_quantity", ["أدخل الكمية", "Enter quantity", "输入数量"]),
    ("enter_price", ["أدخل السعر", "Enter price", "输入价格"]),
    ("cartons", ["كرتون", "cartons", "箱"]),
    ("nearest_multiples", ["أقرب كمية صحيحة", "Nearest full cartons", "最接近的整箱数量"]),
    ("exceeds_available", ["الكمية المطلوبة أكبر من المتاح", "Requested quantity exceeds availability", "请求数量超过可售数量"]),
    ("order_summary", ["ملخص الطلب", "Order summary", "订单摘要"]),
    ("item", ["المنتج", "Item", "商品"]),
    ("item_number", ["رقم الصنف", "Item no.", "货号"]),
    ("quantity", ["الكمية", "Quantity", "数量"]),
    ("price", ["السعر", "Price", "价格"]),
    ("total", ["الإجمالي", "Total", "合计"]),
    ("total_quantity", ["إجمالي الكمية", "Total quantity", "总数量"]),
    ("total_price", ["إجمالي السعر", "Total price", "总价"]),
    ("notes", ["ملاحظات", "Notes", "备注"]),
    ("notes_placeholder", ["أضف ملاحظات لطلب التفاوض (اختياري)", "Add notes to your negotiation request (optional)", "为议价请求添加备注（可选）"]),
    ("guest_contact", ["بيانات التواصل", "Contact details", "联系方式"]),
    ("guest_name", ["الاسم", "Name", "姓名"]),
    ("guest_email", ["البريد الإلكتروني", "Email", "邮箱"]),
    ("guest_phone", ["رقم الهاتف", "Phone", "电话"]),
    ("guest_contact_required", ["الاسم والبريد الإلكتروني ورقم الهاتف مطلوبة لإرسال الطلب", "Name, email and phone are required to send the request", "发送请求需填写姓名、邮箱和电话"]),
    ("send_request", ["إرسال طلب التفاوض", "Send negotiation request", "发送议价请求"]),
    ("sending", ["جاري الإرسال...", "Sending...", "发送中..."]),
    ("request_sent", ["تم إرسال طلب التفاوض بنجاح", "Negotiation request sent", "议价请求已发送"]),
    ("request_failed", ["فشل إرسال طلب التفاوض", "Failed to send negotiation request", "发送议价请求失败"]),
    ("no_items_selected", ["يرجى اختيار منتج واحد على الأقل", "Please select at least one item", "请至少选择一件商品"]),
    ("quantity_exceeds_for", ["الكمية المطلوبة أكبر من المتاح للمنتجات:", "Requested quantity exceeds availability for:", "以下商品的请求数量超过可售数量："]),
    ("carton_multiple_for", ["يجب أن تكون الكمية من مضاعفات الكرتون للمنتجات:", "Quantity must be a carton multiple for:", "以下商品的数量必须为整箱倍数："]),
    ("price_quote", ["عرض السعر", "Price quote", "报价单"]),
    ("deal_number", ["رقم الصفقة", "Deal number", "交易编号"]),
    ("date", ["التاريخ", "Date", "日期"]),
    ("client", ["العميل", "Client", "客户"]),
    ("trader", ["التاجر", "Trader", "卖家"]),
    ("employee", ["الموظف", "Employee", "专员"]),
    ("shipping_type", ["نوع الشحن", "Shipping type", "运输方式"]),
    ("shipping_sea", ["شحن بحري", "Sea freight", "海运"]),
    ("shipping_land", ["شحن بري", "Land freight", "陆运"]),
    ("status", ["الحالة", "Status", "状态"]),
    ("status_negotiation", ["قيد التفاوض", "In negotiation", "议价中"]),
    ("status_approved", ["مقبول", "Approved", "已接受"]),
    ("status_rejected", ["مرفوض", "Rejected", "已拒绝"]),
    ("status_cancelled", ["ملغي", "Cancelled", "已取消"]),
    ("status_paid", ["مدفوع", "Paid", "已支付"]),
    ("status_unknown", ["غير معروف", "Unknown", "未知"]),
    ("download_sheet", ["تحميل ملف إكسل", "Download spreadsheet", "下载表格"]),
    ("deal_amount", ["قيمة الصفقة", "Deal amount", "交易金额"]),
    ("platform_commission", ["عمولة المنصة", "Platform commission", "平台佣金"]),
    ("shipping_commission", ["عمولة الشحن للعميل", "Shipping to client", "客户运费佣金"]),
    ("grand_total", ["الإجمالي النهائي", "Grand total", "总计"]),
    ("accept_quote", ["قبول العرض", "Accept quote", "接受报价"]),
    ("reject_quote", ["رفض العرض", "Reject quote", "拒绝报价"]),
    ("processing", ["جاري المعالجة...", "Processing...", "处理中..."]),
    ("quote_expired", ["انتهت صلاحية عرض السعر (72 ساعة)", "This quote has expired (72 hours)", "报价已过期（72小时）"]),
    ("quote_accepted_go_cart", ["تم قبول العرض، يمكنك المتابعة لإتمام الدفع", "Quote accepted, you can proceed to payment", "报价已接受，可继续付款"]),
    ("go_to_cart", ["الانتقال إلى سلة الصفقة", "Go to deal cart", "前往交易购物车"]),
    ("payment_completed", ["تم الدفع بنجاح", "Payment completed", "付款已完成"]),
    ("auto_cancelled_notice", ["أُلغيت الصفقة تلقائياً لعدم الرد خلال 72 ساعة", "The deal was cancelled automatically after the 72-hour approval window", "因超过72小时未确认，交易已自动取消"]),
    ("cancelled_notice", ["تم إلغاء هذه الصفقة", "This deal has been cancelled", "该交易已取消"]),
    ("accept_failed", ["فشل قبول العرض", "Failed to accept the quote", "接受报价失败"]),
    ("reject_failed", ["فشل رفض العرض", "Failed to reject the quote", "拒绝报价失败"]),
    ("serial", ["م", "#", "序号"]),
    ("negotiated_price", ["السعر المتفاوض عليه", "Negotiated price", "议定价格"]),
    ("negotiated_quantity", ["الكمية المتفاوض عليها", "Negotiated quantity", "议定数量"]),
    ("platform_name", ["ستوك شيب", "Stockship", "Stockship"]),
    ("platform_tagline", ["منصة الوساطة التجارية بين التجار والعملاء", "The B2B trade mediation platform", "B2B贸易中介平台"]),
    ("sheet_footer", ["تم إنشاء هذا الملف تلقائياً من منصة ستوك شيب", "Generated automatically by the Stockship platform", "本文件由Stockship平台自动生成"]),
    ("negotiations", ["طلبات التفاوض", "Negotiations", "议价请求"]),
    ("no_negotiations", ["لا توجد طلبات تفاوض بعد", "No negotiations yet", "暂无议价请求"]),
    ("view_quote", ["عرض السعر", "View quote", "查看报价"]),
    ("cart_title", ["سلة الصفقة", "Deal cart", "交易购物车"]),
    ("cart_hint", ["تتم متابعة الدفع والشحن من هذه الصفحة", "Payment and shipping continue from this page", "付款与物流将在此页面继续"]),
];

static TRANSLATIONS: Lazy<HashMap<&'static str, [&'static str; 3]>> =
    Lazy::new(|| TABLE.iter().copied().collect());

/// Translate a key for the given locale. Unknown keys render as-is,
/// which keeps a missing entry visible instead of blank.
pub fn tr(locale: Locale, key: &str) -> String {
    TRANSLATIONS
        .get(key)
        .map(|entry| entry[locale.index()].to_string())
        .unwrap_or_else(|| key.to_string())
}

const LOCALE_KEY: &str = "locale";

fn stored_locale() -> Option<Locale> {
    let storage = web_sys::window()?.local_storage().ok()??;
    let code = storage.get_item(LOCALE_KEY).ok()??;
    Locale::from_code(&code)
}

fn persist_locale(locale: Locale) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(LOCALE_KEY, locale.code());
    }
}

/// Locale context provider component
#[component]
pub fn LocaleProvider(children: ChildrenFn) -> impl IntoView {
    let locale = RwSignal::new(stored_locale().unwrap_or_default());

    // Persist the selection and keep <html dir= lang=> in sync
    Effect::new(move |_| {
        let current = locale.get();
        persist_locale(current);
        if let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("dir", current.dir());
            let _ = root.set_attribute("lang", current.code());
        }
    });

    provide_context(locale);

    children()
}

/// Hook to access the current locale
pub fn use_locale() -> RwSignal<Locale> {
    use_context::<RwSignal<Locale>>().expect("LocaleProvider not found in component tree")
}

/// Three-button language switcher shown in page headers
#[component]
pub fn LocaleSwitcher() -> impl IntoView {
    let locale = use_locale();

    let button = move |target: Locale, label: &'static str| {
        view! {
            <button
                class="locale-btn"
                class:active=move || locale.get() == target
                on:click=move |_| locale.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <div class="locale-switcher">
            {button(Locale::Ar, "العربية")}
            {button(Locale::En, "English")}
            {button(Locale::Zh, "中文")}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_translated_in_all_locales() {
        for (key, entry) in TABLE {
            for text in entry {
                assert!(!text.is_empty(), "missing translation for {key}");
            }
        }
    }

    #[test]
    fn unknown_keys_fall_through() {
        assert_eq!(tr(Locale::En, "does_not_exist"), "does_not_exist");
        assert_eq!(tr(Locale::Ar, "price_quote"), "عرض السعر");
        assert_eq!(tr(Locale::Zh, "price_quote"), "报价单");
    }

    #[test]
    fn direction_follows_locale() {
        assert_eq!(Locale::Ar.dir(), "rtl");
        assert_eq!(Locale::En.dir(), "ltr");
        assert_eq!(Locale::from_code("zh"), Some(Locale::Zh));
        assert_eq!(Locale::from_code("fr"), None);
    }
}

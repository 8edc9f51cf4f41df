use super::work::{Availability, Work, present};

/// The outbound affordance rendered next to a work's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkAction {
    Inquire { mailto: String },
    PurchasePrint { url: String },
    /// Upper-case status with nothing to activate.
    Status { label: String },
    Hidden,
}

impl WorkAction {
    pub fn for_work(work: &Work, recipient: &str) -> Self {
        let availability = work.effective_availability();
        if availability == Availability::Available || work.is_for_sale {
            return Self::Inquire {
                mailto: inquiry_mailto(work, recipient),
            };
        }
        if let Some(url) = present(&work.print_url) {
            return Self::PurchasePrint {
                url: url.to_string(),
            };
        }
        match availability {
            Availability::Sold | Availability::PrivateCollection => Self::Status {
                label: availability.label().to_uppercase(),
            },
            _ => Self::Hidden,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Inquire { .. } => Some("INQUIRE ABOUT ORIGINAL"),
            Self::PurchasePrint { .. } => Some("PURCHASE PRINT"),
            Self::Status { label } => Some(label),
            Self::Hidden => None,
        }
    }

    /// Target to hand to the opener, if this action is interactive.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Inquire { mailto } => Some(mailto),
            Self::PurchasePrint { url } => Some(url),
            Self::Status { .. } | Self::Hidden => None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.target().is_some()
    }
}

pub fn inquiry_mailto(work: &Work, recipient: &str) -> String {
    let subject = format!("Inquiry: {}", work.title);
    let body = format!(
        "Hi,\n\nI'm interested in learning more about \"{}\" ({}).\n\nDetails:\n\u{2022} Medium: {}\n\u{2022} Dimensions: {}\n\nPlease let me know about pricing and availability.\n\nThank you!",
        work.title, work.year, work.medium, work.dimensions
    );
    format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

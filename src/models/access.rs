// src/models/access.rs

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Páginas do painel que passam pela tabela de acesso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Eligibility,
    Review,
    Allocation,
    Invigilation,
    Message,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Eligibility,
        Page::Review,
        Page::Allocation,
        Page::Invigilation,
        Page::Message,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Page::Eligibility => "eligibility",
            Page::Review => "review",
            Page::Allocation => "allocation",
            Page::Invigilation => "invigilation",
            Page::Message => "message",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL.into_iter().find(|page| page.slug() == s).ok_or(())
    }
}

// Resposta do dashboard: quem está logado e o que aparece no menu
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: crate::models::auth::User,
    pub pages: Vec<Page>,
    pub is_admin: bool,
}

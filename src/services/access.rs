// src/services/access.rs

use anyhow::{bail, Context};
use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
    sync::Arc,
};

use crate::models::{access::Page, auth::Role};

/// Tabela cargo -> páginas liberadas. Montada no startup e imutável depois.
#[derive(Clone, Debug)]
pub struct AccessTable {
    pages: Arc<HashMap<Role, BTreeSet<Page>>>,
}

impl Default for AccessTable {
    fn default() -> Self {
        let table = HashMap::from([
            (Role::Admin, BTreeSet::from(Page::ALL)),
            (Role::Hod, BTreeSet::from(Page::ALL)),
            (
                Role::ExamCoordinator,
                BTreeSet::from([Page::Allocation, Page::Invigilation, Page::Message]),
            ),
            (Role::Amc, BTreeSet::from([Page::Eligibility, Page::Review])),
        ]);
        Self { pages: Arc::new(table) }
    }
}

impl AccessTable {
    /// Lê a tabela de um JSON no formato `{"Admin": ["eligibility", ...], ...}`.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let parsed: HashMap<Role, Vec<String>> =
            serde_json::from_str(raw).context("tabela de acesso não é um JSON válido")?;

        let mut table = HashMap::with_capacity(parsed.len());
        for (role, slugs) in parsed {
            let pages = slugs
                .iter()
                .map(|slug| slug.parse::<Page>().map_err(|_| anyhow::anyhow!("página desconhecida '{}' para {}", slug, role)))
                .collect::<anyhow::Result<BTreeSet<Page>>>()?;
            table.insert(role, pages);
        }

        for role in Role::ALL {
            match table.get(&role) {
                None => bail!("cargo {} ausente na tabela de acesso", role),
                Some(pages) if pages.is_empty() => bail!("cargo {} sem nenhuma página", role),
                _ => {}
            }
        }
        for role in [Role::Admin, Role::Hod] {
            if table.get(&role).map_or(0, BTreeSet::len) != Page::ALL.len() {
                bail!("cargo {} precisa acessar todas as páginas", role);
            }
        }

        Ok(Self { pages: Arc::new(table) })
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("falha ao ler {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// `page` vem como texto da rota/menu; qualquer identificador desconhecido nega.
    pub fn has_access(&self, role: Role, page: &str) -> bool {
        page.parse::<Page>().is_ok_and(|page| self.can_open(role, page))
    }

    pub fn can_open(&self, role: Role, page: Page) -> bool {
        self.pages.get(&role).is_some_and(|pages| pages.contains(&page))
    }

    pub fn pages_for(&self, role: Role) -> Vec<Page> {
        self.pages
            .get(&role)
            .map(|pages| pages.iter().copied().collect())
            .unwrap_or_default()
    }
}

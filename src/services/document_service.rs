// src/services/document_service.rs

use genpdf::{elements, style, Element};
use std::path::PathBuf;

use crate::{
    common::error::AppError,
    models::allocation::SeatingDraft,
    services::seating_service::{allocated_count, GRID_COLUMNS},
};

const FONT_FAMILY: &str = "Roboto";

#[derive(Clone, Debug)]
pub struct DocumentService {
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(fonts_dir: PathBuf) -> Self {
        Self { fonts_dir }
    }

    /// Layout da sala em PDF (4 colunas x 6 fileiras).
    pub fn seating_layout_pdf(&self, draft: &SeatingDraft, prepared_by: &str) -> Result<Vec<u8>, AppError> {
        // 1. Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, FONT_FAMILY, None).map_err(|_| {
            AppError::FontNotFound(format!("{} não encontrada em {}", FONT_FAMILY, self.fonts_dir.display()))
        })?;

        let configuration = &draft.configuration;
        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Seating layout {}", configuration.room));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(format!("SEAT ALLOCATION - ROOM {}", configuration.room))
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        let sets = configuration
            .slots
            .iter()
            .map(|slot| slot.to_string())
            .collect::<Vec<_>>()
            .join(" / ");
        doc.push(elements::Paragraph::new(format!(
            "Seating: {:?} | Sets: {}",
            configuration.seating_option, sets
        )));
        doc.push(elements::Paragraph::new(format!(
            "Allocated students: {} | Prepared by: {}",
            allocated_count(&draft.seats),
            prepared_by
        )));
        doc.push(elements::Break::new(1.5));

        // --- GRADE DE CARTEIRAS ---
        let mut table = elements::TableLayout::new(vec![1; GRID_COLUMNS]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        for row in draft.seats.chunks(GRID_COLUMNS) {
            let mut table_row = table.row();
            for seat in row {
                let mut cell = elements::LinearLayout::vertical();
                cell.push(
                    elements::Paragraph::new(format!("Seat {}", seat.id))
                        .styled(style::Style::new().bold()),
                );
                for j in 0..configuration.multiplicity() {
                    let roll = seat
                        .roll_numbers
                        .get(j)
                        .filter(|r| !r.is_empty())
                        .map_or("Empty", String::as_str);
                    cell.push(elements::Paragraph::new(roll).styled(style::Style::new().with_font_size(9)));
                }
                table_row.push_element(cell.padded(1));
            }
            // última fileira incompleta
            for _ in row.len()..GRID_COLUMNS {
                table_row.push_element(elements::Paragraph::new(""));
            }
            table_row
                .push()
                .map_err(|e| AppError::PdfError(e.to_string()))?;
        }

        doc.push(table);

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        Ok(buffer)
    }
}

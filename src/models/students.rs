// src/models/students.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// Percentual mínimo para ser elegível direto.
pub const ELIGIBLE_THRESHOLD: u32 = 75;
/// Abaixo disso o aluno é inelegível; entre os dois fica em avaliação.
pub const CONDITIONAL_THRESHOLD: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    #[serde(rename = "BCA")]
    Bca,
    #[serde(rename = "MCA")]
    Mca,
    #[serde(rename = "B.Sc.")]
    Bsc,
    #[serde(rename = "M.Sc.")]
    Msc,
}

impl Program {
    pub const ALL: [Program; 4] = [Program::Bca, Program::Bsc, Program::Mca, Program::Msc];

    pub fn as_str(self) -> &'static str {
        match self {
            Program::Bca => "BCA",
            Program::Mca => "MCA",
            Program::Bsc => "B.Sc.",
            Program::Msc => "M.Sc.",
        }
    }

    /// Código de 3 letras usado no número de matrícula.
    pub fn code(self) -> &'static str {
        match self {
            Program::Bca => "BCA",
            Program::Mca => "MCA",
            Program::Bsc => "BSC",
            Program::Msc => "MSC",
        }
    }

    pub fn year_prefix(self) -> &'static str {
        match self {
            Program::Mca | Program::Msc => "22",
            Program::Bca | Program::Bsc => "20",
        }
    }

    pub fn semester_count(self) -> usize {
        match self {
            Program::Mca | Program::Msc => 4,
            Program::Bca | Program::Bsc => 6,
        }
    }

    pub fn semesters(self) -> &'static [Semester] {
        &Semester::ALL[..self.semester_count()]
    }

    pub fn allows(self, semester: Semester) -> bool {
        self.semesters().contains(&semester)
    }

    /// Número de matrícula: `VU{ano}{código}{sequência:03}`.
    pub fn registration_number(self, sequence: u32) -> String {
        format!("VU{}{}{:03}", self.year_prefix(), self.code(), sequence)
    }

    /// Alunos por turma na base sintética.
    pub fn section_size(self) -> usize {
        match self {
            Program::Bca => 60,
            Program::Bsc => 40,
            Program::Mca | Program::Msc => 20,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Semester {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl Semester {
    pub const ALL: [Semester; 6] = [
        Semester::I,
        Semester::II,
        Semester::III,
        Semester::IV,
        Semester::V,
        Semester::VI,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Semester::I => "I",
            Semester::II => "II",
            Semester::III => "III",
            Semester::IV => "IV",
            Semester::V => "V",
            Semester::VI => "VI",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    A,
    B,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::A, Section::B];

    /// Primeiro número sequencial da matrícula na turma.
    pub fn first_roll(self) -> u32 {
        match self {
            Section::A => 1,
            Section::B => 70,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::A => "A",
            Section::B => "B",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Programa + semestre + turma escolhidos nas telas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassSelection {
    pub program: Program,
    pub semester: Semester,
    pub section: Section,
}

impl ClassSelection {
    pub fn new(program: Program, semester: Semester, section: Section) -> Self {
        Self { program, semester, section }
    }

    pub fn is_valid(&self) -> bool {
        self.program.allows(self.semester)
    }

    pub fn matches(&self, student: &Student) -> bool {
        student.program == self.program
            && student.semester == self.semester
            && student.section == self.section
    }
}

impl fmt::Display for ClassSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.program, self.semester, self.section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    Eligible,
    Conditional,
    Ineligible,
}

impl EligibilityStatus {
    pub fn from_attendance(percentage: Decimal) -> Self {
        if percentage < Decimal::from(CONDITIONAL_THRESHOLD) {
            EligibilityStatus::Ineligible
        } else if percentage < Decimal::from(ELIGIBLE_THRESHOLD) {
            EligibilityStatus::Conditional
        } else {
            EligibilityStatus::Eligible
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCertificate {
    Submitted,
    #[default]
    NotSubmitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub reg_no: String,
    pub name: String,
    pub total_classes: u32,
    pub present: u32,
    pub absent: u32,
    pub percentage: Decimal,
    pub program: Program,
    pub semester: Semester,
    pub section: Section,
    #[serde(default)]
    pub medical_certificate: MedicalCertificate,
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    pub eligibility_status: EligibilityStatus,
    #[serde(default)]
    pub amc_remark: String,
    #[serde(default)]
    pub hod_remark: String,
}

impl Student {
    /// Linha de planilha incoerente: aulas que não fecham ou percentual fora de 0..=100.
    pub fn attendance_problem(&self) -> Option<String> {
        if self.present + self.absent != self.total_classes {
            return Some(format!(
                "{}: present ({}) + absent ({}) must equal total classes ({}).",
                self.reg_no, self.present, self.absent, self.total_classes
            ));
        }
        if self.percentage < Decimal::ZERO || self.percentage > Decimal::ONE_HUNDRED {
            return Some(format!("{}: percentage must be between 0 and 100.", self.reg_no));
        }
        None
    }

    pub fn is_under_evaluation(&self) -> bool {
        self.percentage >= Decimal::from(CONDITIONAL_THRESHOLD)
            && self.percentage < Decimal::from(ELIGIBLE_THRESHOLD)
    }

    /// Entra na lista final: frequência suficiente ou atestado aceito na revisão.
    pub fn is_cleared_for_exam(&self) -> bool {
        self.percentage >= Decimal::from(ELIGIBLE_THRESHOLD)
            || (self.medical_certificate == MedicalCertificate::Submitted
                && self.status == Some(ReviewStatus::Completed)
                && self.eligibility_status == EligibilityStatus::Eligible)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub eligible: usize,
    pub non_eligible: usize,
    pub under_evaluation: usize,
    pub overall: usize,
}

impl ReviewStats {
    pub fn from_students<'a>(students: impl IntoIterator<Item = &'a Student>) -> Self {
        students.into_iter().fold(ReviewStats::default(), |mut stats, student| {
            match student.eligibility_status {
                EligibilityStatus::Eligible => stats.eligible += 1,
                EligibilityStatus::Conditional => stats.under_evaluation += 1,
                EligibilityStatus::Ineligible => stats.non_eligible += 1,
            }
            stats.overall += 1;
            stats
        })
    }
}

// Upload da planilha de frequência (o arquivo em si não é lido)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_attendance_rows"))]
pub struct UploadAttendancePayload {
    #[serde(flatten)]
    pub selection: ClassSelection,
    #[serde(default)]
    pub students: Option<Vec<Student>>,
}

fn validate_attendance_rows(payload: &UploadAttendancePayload) -> Result<(), ValidationError> {
    let rows = payload.students.iter().flatten();
    match rows.filter_map(Student::attendance_problem).next() {
        Some(problem) => Err(ValidationError::new("attendance").with_message(problem.into())),
        None => Ok(()),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    pub selection: ClassSelection,
    pub stats: ReviewStats,
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Accept,
    Reject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecisionPayload {
    pub action: ReviewAction,
    #[serde(default)]
    pub remark: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmitResponse {
    pub selection: ClassSelection,
    pub eligible_count: usize,
    pub students: Vec<Student>,
}

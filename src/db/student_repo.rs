// src/db/student_repo.rs

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::models::students::{
    ClassSelection, EligibilityStatus, MedicalCertificate, Program, ReviewStats, Section, Semester,
    Student,
};

const TOTAL_CLASSES: u32 = 96;

const FIRST_NAMES: [&str; 60] = [
    "Aarav", "Aditi", "Arjun", "Ananya", "Dhruv", "Diya", "Ishaan", "Kavya", "Rohan", "Riya",
    "Vihaan", "Zara", "Kabir", "Kiara", "Vivaan", "Anvi", "Reyansh", "Saanvi", "Ayaan", "Anika",
    "Veer", "Myra", "Arnav", "Pari", "Shaurya", "Aadhya", "Rudra", "Avni", "Krish", "Amaira",
    "Advait", "Anvi", "Atharv", "Avani", "Darsh", "Disha", "Eshaan", "Ira", "Laksh", "Mira",
    "Neev", "Navya", "Pranav", "Prisha", "Reyansh", "Riya", "Sai", "Saanvi", "Veer", "Zoya",
    "Aarush", "Aanya", "Aryan", "Anika", "Devansh", "Diya", "Ishaan", "Isha", "Kabir", "Kyra",
];

const LAST_NAMES: [&str; 60] = [
    "Sharma", "Patel", "Singh", "Kumar", "Gupta", "Joshi", "Malhotra", "Kapoor", "Verma", "Rao",
    "Reddy", "Nair", "Menon", "Pillai", "Iyer", "Agarwal", "Mukherjee", "Chatterjee", "Banerjee",
    "Das", "Bose", "Sen", "Dutta", "Roy", "Choudhury", "Desai", "Shah", "Mehta", "Trivedi",
    "Patil", "Jain", "Khanna", "Chopra", "Mehra", "Bhatia", "Chauhan", "Gill", "Bajwa", "Saxena",
    "Tiwari", "Kulkarni", "Kaur", "Bhatt", "Mishra", "Pandey", "Sinha", "Thakur", "Yadav",
    "Malik", "Hegde", "Rajan", "Nayar", "Menon", "Krishnan", "Mani", "Subramaniam", "Naidu",
    "Murthy", "Sethi", "Arora",
];

/// Base sintética de alunos, gerada uma vez a partir de uma semente.
#[derive(Clone, Debug)]
pub struct StudentRepository {
    seed: u64,
    students: Arc<Vec<Student>>,
}

impl StudentRepository {
    pub fn generate(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut students = Vec::new();

        for program in Program::ALL {
            for &semester in program.semesters() {
                for section in Section::ALL {
                    students.extend(generate_section(&mut rng, program, semester, section));
                }
            }
        }

        tracing::info!("Base sintética gerada: {} alunos (semente {})", students.len(), seed);
        Self { seed, students: Arc::new(students) }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn all(&self) -> &[Student] {
        &self.students
    }

    pub fn students_by_filter(&self, selection: &ClassSelection) -> Vec<Student> {
        self.students.iter().filter(|s| selection.matches(s)).cloned().collect()
    }

    pub fn eligible_students(&self, selection: &ClassSelection) -> Vec<Student> {
        self.by_status(selection, EligibilityStatus::Eligible)
    }

    pub fn conditional_students(&self, selection: &ClassSelection) -> Vec<Student> {
        self.by_status(selection, EligibilityStatus::Conditional)
    }

    pub fn ineligible_students(&self, selection: &ClassSelection) -> Vec<Student> {
        self.by_status(selection, EligibilityStatus::Ineligible)
    }

    pub fn review_stats(&self, selection: &ClassSelection) -> ReviewStats {
        ReviewStats::from_students(self.students.iter().filter(|s| selection.matches(s)))
    }

    fn by_status(&self, selection: &ClassSelection, status: EligibilityStatus) -> Vec<Student> {
        self.students
            .iter()
            .filter(|s| selection.matches(s) && s.eligibility_status == status)
            .cloned()
            .collect()
    }
}

fn generate_section(
    rng: &mut ChaCha8Rng,
    program: Program,
    semester: Semester,
    section: Section,
) -> Vec<Student> {
    let count = program.section_size();
    // 20% abaixo de 65, 20% entre 65 e 74, 60% de 75 para cima
    let ineligible_band = count / 5;
    let conditional_band = count * 2 / 5;

    (0..count)
        .map(|i| {
            let whole: u32 = if i < ineligible_band {
                40 + rng.gen_range(0..25)
            } else if i < conditional_band {
                65 + rng.gen_range(0..10)
            } else {
                75 + rng.gen_range(0..25)
            };
            let hundredths: u32 = rng.gen_range(0..100);
            let percentage = Decimal::new(i64::from(whole * 100 + hundredths), 2);

            let present = (whole * TOTAL_CLASSES + 50) / 100;
            let sequence = section.first_roll() + i as u32;

            Student {
                reg_no: program.registration_number(sequence),
                name: format!(
                    "{} {}",
                    FIRST_NAMES[i % FIRST_NAMES.len()],
                    LAST_NAMES[i % LAST_NAMES.len()]
                ),
                total_classes: TOTAL_CLASSES,
                present,
                absent: TOTAL_CLASSES - present,
                percentage,
                program,
                semester,
                section,
                medical_certificate: MedicalCertificate::NotSubmitted,
                status: None,
                eligibility_status: EligibilityStatus::from_attendance(percentage),
                amc_remark: String::new(),
                hod_remark: String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mca_iv_a() -> ClassSelection {
        ClassSelection::new(Program::Mca, Semester::IV, Section::A)
    }

    #[test]
    fn test_same_seed_same_directory() {
        let a = StudentRepository::generate(7);
        let b = StudentRepository::generate(7);
        assert_eq!(a.all(), b.all());
    }

    #[test]
    fn test_section_sizes_and_numbering() {
        let repo = StudentRepository::generate(1);

        let mca = repo.students_by_filter(&mca_iv_a());
        assert_eq!(mca.len(), 20);
        assert_eq!(mca[0].reg_no, "VU22MCA001");
        assert_eq!(mca[19].reg_no, "VU22MCA020");

        let bca_b = repo.students_by_filter(&ClassSelection::new(Program::Bca, Semester::III, Section::B));
        assert_eq!(bca_b.len(), 60);
        assert_eq!(bca_b[0].reg_no, "VU20BCA070");
        assert_eq!(bca_b[0].name, "Aarav Sharma");

        let bsc = repo.students_by_filter(&ClassSelection::new(Program::Bsc, Semester::VI, Section::A));
        assert_eq!(bsc.len(), 40);
        assert_eq!(bsc[0].reg_no, "VU20BSC001");
    }

    #[test]
    fn test_no_students_outside_program_semesters() {
        let repo = StudentRepository::generate(1);
        let mca_vi = ClassSelection::new(Program::Mca, Semester::VI, Section::B);
        assert!(repo.students_by_filter(&mca_vi).is_empty());
        assert_eq!(repo.review_stats(&mca_vi), ReviewStats::default());
    }

    #[test]
    fn test_stratified_attendance() {
        let repo = StudentRepository::generate(99);
        let stats = repo.review_stats(&mca_iv_a());
        assert_eq!(stats.non_eligible, 4);
        assert_eq!(stats.under_evaluation, 4);
        assert_eq!(stats.eligible, 12);
        assert_eq!(stats.overall, 20);

        let eligible = repo.eligible_students(&mca_iv_a());
        assert_eq!(eligible[0].reg_no, "VU22MCA009");
        assert!(eligible.iter().all(|s| s.percentage >= Decimal::from(75)));

        let conditional = repo.conditional_students(&mca_iv_a());
        assert!(conditional.iter().all(Student::is_under_evaluation));

        for s in repo.ineligible_students(&mca_iv_a()) {
            assert!(s.percentage < Decimal::from(65));
            assert_eq!(s.present + s.absent, TOTAL_CLASSES);
        }
    }
}

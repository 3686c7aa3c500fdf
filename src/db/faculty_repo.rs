// src/db/faculty_repo.rs

use std::sync::Arc;

use crate::models::invigilation::Faculty;

// (id, nome, departamento, email, telefone, cargo, especialidade)
const FACULTY: [(&str, &str, &str, &str, &str, &str, &str); 15] = [
    ("100109", "Abhishek Malik", "Computer Science", "abhishek.malik@example.com", "+91 9876543210", "Assistant Professor", "Artificial Intelligence"),
    ("100102", "Punit Kumar", "Information Technology", "punit.kumar@example.com", "+91 9876543211", "Associate Professor", "Database Systems"),
    ("100107", "Sultan Fahad", "Computer Science", "sultan.fahad@example.com", "+91 9876543212", "Professor", "Computer Networks"),
    ("100115", "Meera Desai", "Information Technology", "meera.desai@example.com", "+91 9876543213", "Assistant Professor", "Web Technologies"),
    ("100123", "Rajesh Khanna", "Computer Science", "rajesh.khanna@example.com", "+91 9876543214", "Professor", "Machine Learning"),
    ("100131", "Priya Singh", "Mathematics", "priya.singh@example.com", "+91 9876543215", "Associate Professor", "Discrete Mathematics"),
    ("100142", "Vikram Kumar", "Computer Science", "vikram.kumar@example.com", "+91 9876543216", "Assistant Professor", "Software Engineering"),
    ("100156", "Neha Verma", "Information Technology", "neha.verma@example.com", "+91 9876543217", "Associate Professor", "Information Security"),
    ("100167", "Karthik Nair", "Computer Science", "karthik.nair@example.com", "+91 9876543218", "Professor", "Computer Graphics"),
    ("100178", "Divya Krishnan", "Mathematics", "divya.krishnan@example.com", "+91 9876543219", "Assistant Professor", "Applied Mathematics"),
    ("100189", "Arjun Reddy", "Computer Science", "arjun.reddy@example.com", "+91 9876543220", "Associate Professor", "Data Science"),
    ("100195", "Sneha Gupta", "Information Technology", "sneha.gupta@example.com", "+91 9876543221", "Assistant Professor", "Cloud Computing"),
    ("100203", "Rahul Patel", "Computer Science", "rahul.patel@example.com", "+91 9876543222", "Professor", "Operating Systems"),
    ("100217", "Ananya Sharma", "Mathematics", "ananya.sharma@example.com", "+91 9876543223", "Associate Professor", "Statistics"),
    ("100224", "Sanjay Mehta", "Information Technology", "sanjay.mehta@example.com", "+91 9876543224", "Assistant Professor", "Mobile Computing"),
];

#[derive(Clone, Debug)]
pub struct FacultyRepository {
    faculty: Arc<Vec<Faculty>>,
}

impl Default for FacultyRepository {
    fn default() -> Self {
        let faculty = FACULTY
            .iter()
            .map(|&(id, name, department, email, phone, designation, specialization)| Faculty {
                id: id.to_string(),
                name: name.to_string(),
                department: department.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                designation: designation.to_string(),
                specialization: specialization.to_string(),
            })
            .collect();
        Self { faculty: Arc::new(faculty) }
    }
}

impl FacultyRepository {
    pub fn all(&self) -> &[Faculty] {
        &self.faculty
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    pub fn by_department(&self, department: &str) -> Vec<Faculty> {
        self.faculty.iter().filter(|f| f.department == department).cloned().collect()
    }

    pub fn by_specialization(&self, specialization: &str) -> Vec<Faculty> {
        self.faculty
            .iter()
            .filter(|f| f.specialization == specialization)
            .cloned()
            .collect()
    }
}

//! Seed data served by the mock backend.

use chrono::{DateTime, Utc};

use campus_core::model::{
    AttendanceSession, AttendanceStatus, Course, CourseStatus, GradeItem, Gradebook, Lecturer,
    SessionCourse, Student, StudentGrade,
};
use campus_core::types::{CourseId, GradeItemId, SessionId, StudentId, UserId};

const THUMBNAIL: &str = "/api/placeholder/800/600";

fn student(id: u64, name: &str, email: &str) -> Student {
    Student {
        id: StudentId(id),
        name: name.to_string(),
        email: email.to_string(),
    }
}

fn item(id: u64, name: &str, max_score: f64, weight: f64) -> GradeItem {
    GradeItem {
        id: GradeItemId(id),
        name: name.to_string(),
        max_score,
        weight,
    }
}

fn grade(student: u64, item: u64, score: f64) -> StudentGrade {
    StudentGrade {
        student_id: StudentId(student),
        grade_item_id: GradeItemId(item),
        score: Some(score),
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: u64,
    code: &str,
    title: &str,
    lecturer: (u64, &str),
    (capacity, enrolled): (u32, u32),
    status: CourseStatus,
    description: &str,
    rating: Option<f32>,
) -> Course {
    Course {
        id: CourseId(id),
        code: code.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        lecturer: Lecturer {
            id: UserId(lecturer.0),
            name: lecturer.1.to_string(),
        },
        capacity,
        enrolled,
        status,
        rating,
        thumbnail: Some(THUMBNAIL.to_string()),
        students: Vec::new(),
        grade_items: Vec::new(),
    }
}

/// The course catalogue: two active courses with free seats, one full
/// upcoming course and one completed course.
pub(crate) fn courses() -> Vec<Course> {
    let mut cs101 = course(
        1,
        "CS101",
        "Introduction to Computer Science",
        (1, "Dr. Alan Smith"),
        (150, 142),
        CourseStatus::Active,
        "A comprehensive introduction to computer science fundamentals, covering algorithms, data structures, and programming basics.",
        Some(4.5),
    );
    cs101.students = vec![
        student(1, "John Doe", "john.doe@university.edu"),
        student(2, "Jane Smith", "jane.smith@university.edu"),
    ];
    cs101.grade_items = vec![
        item(1, "Midterm Exam", 100.0, 0.3),
        item(2, "Final Project", 100.0, 0.4),
        item(3, "Assignments", 100.0, 0.3),
    ];

    let mut math201 = course(
        2,
        "MATH201",
        "Linear Algebra",
        (2, "Prof. Sarah Johnson"),
        (100, 87),
        CourseStatus::Active,
        "Study of linear equations, matrices, vector spaces, and linear transformations.",
        Some(4.2),
    );
    math201.students = vec![
        student(3, "Michael Brown", "michael.b@university.edu"),
        student(4, "Emily Wilson", "e.wilson@university.edu"),
    ];
    math201.grade_items = vec![
        item(4, "Quiz 1", 50.0, 0.15),
        item(5, "Quiz 2", 50.0, 0.15),
        item(6, "Midterm", 100.0, 0.3),
        item(7, "Final Exam", 100.0, 0.4),
    ];

    let mut bio303 = course(
        3,
        "BIO303",
        "Molecular Biology",
        (3, "Dr. Maria Garcia"),
        (75, 75),
        CourseStatus::Upcoming,
        "Advanced study of cellular processes and molecular genetics.",
        None,
    );
    bio303.grade_items = vec![
        item(8, "Lab Reports", 100.0, 0.4),
        item(9, "Research Paper", 100.0, 0.3),
        item(10, "Final Exam", 100.0, 0.3),
    ];

    let mut hist105 = course(
        4,
        "HIST105",
        "World History",
        (4, "Prof. James Anderson"),
        (200, 189),
        CourseStatus::Completed,
        "Survey of major historical events and developments across civilizations.",
        Some(4.8),
    );
    hist105.students = vec![
        student(5, "David Lee", "d.lee@university.edu"),
        student(6, "Sarah Chen", "s.chen@university.edu"),
        student(7, "Robert Taylor", "r.taylor@university.edu"),
    ];
    hist105.grade_items = vec![
        item(11, "Essay 1", 100.0, 0.25),
        item(12, "Essay 2", 100.0, 0.25),
        item(13, "Participation", 100.0, 0.2),
        item(14, "Final Paper", 100.0, 0.3),
    ];

    vec![cs101, math201, bio303, hist105]
}

pub(crate) fn gradebooks() -> Vec<Gradebook> {
    vec![Gradebook {
        id: CourseId(1),
        code: "CS101".to_string(),
        name: "Introduction to Programming".to_string(),
        lecturer: "Dr. Smith".to_string(),
        students: vec![
            student(1, "John Doe", "john@example.com"),
            student(2, "Jane Smith", "jane@example.com"),
        ],
        grade_items: vec![
            item(1, "Quiz 1", 20.0, 20.0),
            item(2, "Midterm", 100.0, 30.0),
            item(3, "Final", 100.0, 50.0),
        ],
        grades: vec![grade(1, 1, 18.0), grade(1, 2, 85.0), grade(2, 1, 15.0)],
        published: false,
    }]
}

/// One active session that started at `now`.
pub(crate) fn sessions(now: DateTime<Utc>) -> Vec<AttendanceSession> {
    vec![AttendanceSession {
        id: SessionId(1),
        course_id: CourseId(1),
        course: SessionCourse {
            title: "Web Development".to_string(),
            lecturer: "Dr. Smith".to_string(),
        },
        status: AttendanceStatus::Active,
        start_time: now,
        require_location: true,
        present_count: 15,
        total_students: 20,
        attendance_marked: None,
    }]
}

pub mod python;
pub mod scanner;

pub use python::PythonAnalyzer;
pub use scanner::Scanner;

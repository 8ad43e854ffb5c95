pub mod nodeutilization;

// ADIF (Amateur Data Interchange Format) Parser and Writer
// Reference: https://adif.org/

pub mod fields;
pub mod import;
pub mod parser;
pub mod writer;

pub use fields::{field_mapping, AdifFields, FieldMapping, ADIF_FIELDS};
pub use import::{import_adif, import_adif_file, AdifImportResult};
pub use parser::{parse_adif, AdifFile, AdifRecord};
pub use writer::{export_adif, export_adif_at, export_filename, AdifExport, ExportOptions};

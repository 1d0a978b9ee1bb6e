use std::fs::OpenOptions;

use crate::domain::supplier::Supplier;

/// Append supplier rows to a CSV file, writing the header only when the
/// file is new or empty.
pub fn append_suppliers(path: &str, suppliers: &[Supplier]) -> anyhow::Result<()> {
    let write_header = match std::fs::metadata(path) {
        Ok(metadata) => metadata.len() == 0,
        Err(_) => true,
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);

    for supplier in suppliers {
        writer.serialize(supplier)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::supplier::Supplier;

    use super::append_suppliers;

    fn supplier(name: &str) -> Supplier {
        Supplier {
            category: "Hot Forgings".to_string(),
            name: name.to_string(),
            website: format!("https://{}.example", name),
            email: "sales@acme.example".to_string(),
            phone: "[content protected]".to_string(),
            ranking: "Not Ranked".to_string(),
        }
    }

    #[test]
    fn header_is_written_only_once_across_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suppliers.csv");
        let path = path.to_str().unwrap();

        append_suppliers(path, &[supplier("acme")]).unwrap();
        append_suppliers(path, &[supplier("globex")]).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "category,name,website,email,phone,ranking");
        assert!(lines[1].contains("acme"));
        assert!(lines[2].contains("globex"));
    }
}

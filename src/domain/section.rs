/// The canonical sections a deep scrape reply is folded into. Every
/// formatted result carries exactly one line per section, plus one indexed
/// "Supplier Details" block per supplier when a page lists several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    PhoneNumber,
    Email,
    SupplierDetails,
    Location,
    ProductPricing,
    IsoCertifications,
    ManufacturingProcessSummary,
}

pub const MULTIPLE_SUPPLIERS_MARKER: &str = "Multiple Suppliers Detected on this Website";
pub const NO_DATA_SENTINEL: &str = "No structured data extracted.";

impl Section {
    // Match order matters: a line is routed to the first keyword it contains.
    pub const ALL: [Section; 7] = [
        Section::PhoneNumber,
        Section::Email,
        Section::SupplierDetails,
        Section::Location,
        Section::ProductPricing,
        Section::IsoCertifications,
        Section::ManufacturingProcessSummary,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Section::PhoneNumber => "Phone Number",
            Section::Email => "Email",
            Section::SupplierDetails => "Supplier Details",
            Section::Location => "Location",
            Section::ProductPricing => "Product Pricing",
            Section::IsoCertifications => "ISO Certifications",
            Section::ManufacturingProcessSummary => "Manufacturing Process Summary",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Section::PhoneNumber => "Phone Numbers",
            Section::Email => "Emails",
            Section::SupplierDetails => "Supplier Details",
            Section::Location => "Location",
            Section::ProductPricing => "Product Pricing",
            Section::IsoCertifications => "ISO Certifications",
            Section::ManufacturingProcessSummary => "Manufacturing Process Summary",
        }
    }

    pub fn default_line(&self) -> String {
        let message = match self {
            Section::IsoCertifications => "No ISO certifications mentioned.",
            Section::ManufacturingProcessSummary => "Please contact the supplier for details.",
            Section::Location => "Not specified in the text.",
            _ => "Not found in the text.",
        };
        format!("**{}**: {}", self.display_name(), message)
    }

    fn matches(&self, line: &str) -> bool {
        line.to_lowercase().contains(&self.keyword().to_lowercase())
    }
}

/// Fold a freeform extraction reply into the canonical section lines.
///
/// Header detection is a case-insensitive substring heuristic, so a data
/// value containing a section keyword will be routed as a header. Callers
/// that need stricter parsing swap this function out, nothing else.
///
/// The output re-parses cleanly: indexed supplier headers keep the
/// "Supplier Details" keyword and block lines keep their "- " marker, so
/// formatting an already formatted reply yields the same text.
pub fn format_llm_reply(reply: &str) -> String {
    let lines: Vec<&str> = reply.lines().map(|line| line.trim()).collect();

    let supplier_header_lines = lines
        .iter()
        .filter(|line| line.to_lowercase().contains("supplier details"))
        .count();
    let multiple_suppliers = supplier_header_lines > 1;

    let mut flat_lines: Vec<String> = vec![];
    let mut supplier_blocks: Vec<Vec<String>> = vec![];
    let mut current_section: Option<Section> = None;

    for line in lines {
        if line.is_empty() {
            continue;
        }

        match Section::ALL.iter().find(|section| section.matches(line)) {
            Some(section) => {
                current_section = Some(*section);
                let content = header_content(line, section.keyword());

                if *section == Section::SupplierDetails && multiple_suppliers {
                    supplier_blocks.push(vec![format!(
                        "**Supplier Details ({})**: {}",
                        supplier_blocks.len() + 1,
                        content
                    )]);
                } else {
                    flat_lines.push(format!("**{}**: {}", section.display_name(), content));
                }
            }
            None => match current_section {
                Some(Section::SupplierDetails) if multiple_suppliers => {
                    if let Some(block) = supplier_blocks.last_mut() {
                        let content = line.strip_prefix("- ").unwrap_or(line);
                        block.push(format!("  - {}", content));
                    }
                }
                Some(_) => {
                    if let Some(last) = flat_lines.last_mut() {
                        last.push(' ');
                        last.push_str(line);
                    }
                }
                None => {}
            },
        }
    }

    // Defaults land at the end of the flat region, before the supplier
    // blocks, so the output keeps its shape under a second pass.
    for section in Section::ALL.iter() {
        let present = flat_lines
            .iter()
            .chain(supplier_blocks.iter().flatten())
            .any(|line| line.contains(section.display_name()));
        if !present {
            flat_lines.push(section.default_line());
        }
    }

    let mut output: Vec<String> = vec![];
    if multiple_suppliers {
        output.push(MULTIPLE_SUPPLIERS_MARKER.to_string());
    }
    output.extend(flat_lines);
    for block in supplier_blocks {
        output.extend(block);
    }

    match output.is_empty() {
        true => NO_DATA_SENTINEL.to_string(),
        false => output.join("\n"),
    }
}

// Content is whatever follows the first colon; without one, the keyword's
// length is chopped off the front of the line.
fn header_content(line: &str, keyword: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => line
            .char_indices()
            .nth(keyword.chars().count())
            .map(|(idx, _)| line[idx..].trim().to_string())
            .unwrap_or_default(),
    }
}

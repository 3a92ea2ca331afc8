use genaxis_core::ucsc::{HttpTransport, TransportResponse, UcscResult};
use std::cell::RefCell;

/// Transport answering every GET with one canned response and recording URLs.
pub struct FakeTransport {
    status: u16,
    body: String,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn get(&self, url: &str) -> UcscResult<TransportResponse> {
        self.requests.borrow_mut().push(url.to_string());
        Ok(TransportResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

pub const BASE_URL: &str = "https://ucsc.test";

/// A `refGene` payload with one positional row on chrI.
pub fn single_ref_gene_payload() -> String {
    serde_json::json!({
        "genome": "ce11",
        "columnTypes": [
            {"name": "bin"}, {"name": "name"}, {"name": "chrom"}, {"name": "strand"},
            {"name": "txStart"}, {"name": "txEnd"}, {"name": "cdsStart"}, {"name": "cdsEnd"},
            {"name": "exonCount"}, {"name": "exonStarts"}, {"name": "exonEnds"},
            {"name": "score"}, {"name": "name2"}, {"name": "cdsStartStat"},
            {"name": "cdsEndStat"}, {"name": "exonFrames"}
        ],
        "refGene": {
            "chrI": [[
                585, "NM_001", "chrI", "+", 100, 900, 150, 850, 2,
                [100, 500], [300, 900], 0, "unc-54", "cmpl", "cmpl", [0, 1]
            ]]
        }
    })
    .to_string()
}

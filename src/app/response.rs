use crate::utils::error::{codes, Result, ShipmentError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 標準輸出格式：結果碼、訊息、筆數與資料列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBox {
    pub errcod: i32,
    pub errmsg: String,
    pub total: usize,
    pub rows: Vec<Value>,
}

impl ResultBox {
    pub fn new_one_by_code(code: i32) -> Self {
        Self {
            errcod: code,
            errmsg: codes::message(code).to_string(),
            total: 0,
            rows: Vec::new(),
        }
    }

    /// 受影響筆數；0 筆視為失敗
    pub fn build_by_count(affected: usize) -> Self {
        if affected == 0 {
            return Self::new_one_by_code(codes::STANDARD);
        }
        let mut result = Self::new_one_by_code(codes::OK);
        result.total = affected;
        result
    }

    pub fn build_by_row<T: Serialize>(row: &T) -> Result<Self> {
        let mut result = Self::new_one_by_code(codes::OK);
        result.rows.push(serde_json::to_value(row)?);
        result.total = 1;
        Ok(result)
    }

    pub fn build_by_rows<T: Serialize>(rows: &[T]) -> Result<Self> {
        if rows.is_empty() {
            return Ok(Self::new_one_by_code(codes::EMPTY_RESULT_SET));
        }

        let mut result = Self::new_one_by_code(codes::OK);
        result.rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?;
        result.total = rows.len();
        Ok(result)
    }

    pub fn from_error(error: &ShipmentError) -> Self {
        let mut result = Self::new_one_by_code(error.code());
        result.errmsg = error.to_string();
        result
    }

    pub fn is_ok(&self) -> bool {
        self.errcod == codes::OK
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 將資料列輸出為 CSV，欄位取自第一列；陣列欄位以 `;` 串接
    pub fn rows_to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let headers: Vec<String> = match self.rows.first() {
            Some(Value::Object(first)) => {
                let mut keys: Vec<String> = first.keys().cloned().collect();
                keys.sort();
                keys
            }
            Some(_) => vec!["value".to_string()],
            None => Vec::new(),
        };

        if !headers.is_empty() {
            writer.write_record(&headers)?;
        }

        for row in &self.rows {
            let record: Vec<String> = match row {
                Value::Object(fields) => headers
                    .iter()
                    .map(|header| fields.get(header).map(csv_cell).unwrap_or_default())
                    .collect(),
                other => vec![csv_cell(other)],
            };
            writer.write_record(&record)?;
        }

        let data = writer.into_inner().map_err(|e| ShipmentError::StorageError {
            message: format!("CSV buffer error: {}", e),
        })?;
        String::from_utf8(data).map_err(|e| ShipmentError::StorageError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(csv_cell).collect::<Vec<_>>().join(";"),
        other => other.to_string(),
    }
}

use serde::{Deserialize, Serialize};

/// 由儲存層配發的識別碼，從 1 開始遞增
pub type ShipmentId = u64;

/// 重量，單位固定為公斤
pub type Kilograms = u64;

/// 存放在實體表中的記錄
pub trait Entity: Clone {
    const KIND: &'static str;

    fn id(&self) -> ShipmentId;
    fn set_id(&mut self, id: ShipmentId);
}

/// 可拆分的頂層運單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootShipment {
    pub id: ShipmentId,
    pub weight: Kilograms,
    /// 拆分出的子運單，拆分前為空
    #[serde(default)]
    pub split_shipments: Vec<ShipmentId>,
}

impl RootShipment {
    pub fn new(weight: Kilograms) -> Self {
        Self {
            id: 0,
            weight,
            split_shipments: Vec::new(),
        }
    }

    pub fn is_split(&self) -> bool {
        !self.split_shipments.is_empty()
    }
}

/// 拆分產生的子運單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardShipment {
    pub id: ShipmentId,
    pub weight: Kilograms,
    pub root_shipment: Option<ShipmentId>,
    /// 合併去向，一經設定不再變更
    pub merged_into: Option<ShipmentId>,
}

impl StandardShipment {
    pub fn split_from(root_id: ShipmentId, weight: Kilograms) -> Self {
        Self {
            id: 0,
            weight,
            root_shipment: Some(root_id),
            merged_into: None,
        }
    }
}

/// 由多筆子運單合併而成的運單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedShipment {
    pub id: ShipmentId,
    pub weight: Kilograms,
    #[serde(default)]
    pub merged_from: Vec<ShipmentId>,
}

impl MergedShipment {
    pub fn new(weight: Kilograms, merged_from: Vec<ShipmentId>) -> Self {
        Self {
            id: 0,
            weight,
            merged_from,
        }
    }
}

impl Entity for RootShipment {
    const KIND: &'static str = "Root shipment";

    fn id(&self) -> ShipmentId {
        self.id
    }

    fn set_id(&mut self, id: ShipmentId) {
        self.id = id;
    }
}

impl Entity for StandardShipment {
    const KIND: &'static str = "Standard shipment";

    fn id(&self) -> ShipmentId {
        self.id
    }

    fn set_id(&mut self, id: ShipmentId) {
        self.id = id;
    }
}

impl Entity for MergedShipment {
    const KIND: &'static str = "Merged shipment";

    fn id(&self) -> ShipmentId {
        self.id
    }

    fn set_id(&mut self, id: ShipmentId) {
        self.id = id;
    }
}

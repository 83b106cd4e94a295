//! Logical entity and attribute names used by the handlers.

/// `rel_asset` and its attributes.
pub mod asset {
    pub const ENTITY: &str = "rel_asset";

    pub const UNIQUE_IDENTIFIER: &str = "rel_uniqueidentifier";
    pub const ASSET_TYPE: &str = "rel_assettype";
    pub const SERVICE_TYPE: &str = "rel_servicetype";
    pub const READINESS_STATUS: &str = "rel_readinessstatus";

    pub const WELL_CODE: &str = "rel_wellcode";
    pub const PIPELINE_ID: &str = "rel_pipelineid";
    pub const FACILITY_ID: &str = "rel_facilityid";
    pub const BURROWPIT_ID: &str = "rel_burrowpitid";
    pub const FLOWLINE_ID: &str = "rel_flowlineid";
    pub const BULKLINE_ID: &str = "rel_bulklineid";
    pub const MANIFOLD_ID: &str = "rel_manifoldid";

    pub const ASSET_CODE: &str = "rel_assetcode";
    pub const NAME: &str = "rel_name";
}

/// `rel_assetyearlycycle` and its attributes.
pub mod cycle {
    pub const ENTITY: &str = "rel_assetyearlycycle";

    pub const ASSET: &str = "rel_asset";
    pub const ASSET_TYPE: &str = "rel_assettype";
    pub const P50_EDM_COST: &str = "rel_p50edmcost";
    pub const P50_MOD: &str = "rel_p50mod";
    pub const DECOMMISSIONING_YEAR: &str = "rel_actualyearofdecommissioning";
    pub const TRACKER: &str = "rel_p50modtracker";
    pub const CREATED_ON: &str = "createdon";
}

/// Approval request, its template and stage entities.
pub mod approval {
    pub const REQUEST_ENTITY: &str = "rel_approval_request";
    pub const TEMPLATE: &str = "rel_approvaltemplate";

    pub const STAGE_TEMPLATE_ENTITY: &str = "rel_approvalstagetemplate";
    pub const STAGE_TEMPLATE_NAME: &str = "rel_name";
    pub const STAGE_TEMPLATE_APPROVER: &str = "rel_approvalstageapprover";

    pub const REQUEST_STAGE_ENTITY: &str = "rel_approvalrequeststage";
    pub const REQUEST_STAGE_REQUEST: &str = "rel_approvalrequest";
    pub const REQUEST_STAGE_NAME: &str = "rel_approvalrequeststagename";
    pub const REQUEST_STAGE_APPROVER: &str = "rel_stageapprover";

    pub const STAGE_ORDER: &str = "rel_stageorder";
}

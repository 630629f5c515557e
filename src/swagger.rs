use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::raffle::get_state,
        handlers::raffle::advance,
        handlers::raffle::back,
        handlers::raffle::draw,
        handlers::raffle::confirm,
        handlers::raffle::discard,
        handlers::raffle::reset,
        handlers::handoff::get_state,
        handlers::handoff::scan,
        handlers::handoff::select,
        handlers::handoff::complete,
        handlers::handoff::reset,
        handlers::mappings::list,
        handlers::mappings::editor_state,
        handlers::mappings::begin_edit,
        handlers::mappings::begin_remove,
        handlers::mappings::choose_winner,
        handlers::mappings::confirm,
        handlers::mappings::cancel,
        handlers::mappings::wipe,
        handlers::cancels::list,
        handlers::cancels::edit,
        handlers::cancels::scan,
        handlers::cancels::draft,
        handlers::cancels::clear_draft,
        handlers::cancels::apply_draft,
        handlers::cancels::wipe,
        handlers::participants::list,
        handlers::participants::upload,
        handlers::participants::wipe,
        handlers::prizes::list,
        handlers::prizes::upload,
        handlers::prizes::wipe,
    ),
    components(
        schemas(
            Participant,
            Prize,
            Mapping,
            MappingAction,
            MappingRow,
            MappingEditorStatus,
            BeginMappingEditRequest,
            ChooseWinnerRequest,
            RafflePhase,
            RaffleStatus,
            HandoffPhase,
            HandoffPrizeRow,
            HandoffStatus,
            HandoffScanRequest,
            HandoffSelectRequest,
            HandoffCompleteRequest,
            HandoffReceipt,
            CancelsAction,
            CancelsEditRequest,
            CancelsEditOutcome,
            CancelRow,
            ScanCancelRequest,
            CancelsDraft,
            UploadOutcome,
            handlers::cancels::ApplyDraftRequest,
        )
    ),
    tags(
        (name = "raffle", description = "Live draw state machine"),
        (name = "handoff", description = "Prize handoff desk flow"),
        (name = "mappings", description = "Winner mapping list and editor"),
        (name = "cancels", description = "Cancel flag editor"),
        (name = "participants", description = "Participant list administration"),
        (name = "prizes", description = "Prize list administration"),
    ),
    info(
        title = "Raffle Console API",
        version = "1.0.0",
        description = "Operator console for the event raffle: live draw, handoff desk and list administration"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#![deny(clippy::all, clippy::pedantic)]

use imanage::api::MemberQuery;
use imanage_api_types::{
    AddMemberRequest, FilterMembersRequest, GeoSearchRequest, UpdateMemberOrderRequest,
    UpdateMemberStatusRequest,
};

use crate::args::MembersCmd;
use crate::client::{CliError, Ctx};
use crate::print::{print_found, print_json};

pub async fn handle(ctx: &Ctx, cmd: MembersCmd) -> Result<(), CliError> {
    let community = &ctx.console.community;
    match cmd {
        MembersCmd::List {
            icom,
            page,
            limit,
            search,
            industry,
            province,
            status,
            rank,
        } => {
            let query = MemberQuery {
                page,
                limit,
                filter: FilterMembersRequest {
                    industry,
                    province,
                    status: status.map(Into::into),
                    rank: rank.map(Into::into),
                    ..FilterMembersRequest::default()
                },
                search,
            };
            print_json(&community.members(&icom, &query).await?)
        }
        MembersCmd::Get { icom, shop } => {
            print_found("member", community.member(&icom, &shop).await?)
        }
        MembersCmd::Add { icom, payload } => {
            let request: AddMemberRequest = payload.parse()?;
            print_json(&community.add_member(&icom, &request).await?)
        }
        MembersCmd::Remove { icom, shop } => {
            print_json(&community.remove_member(&icom, &shop).await?)
        }
        MembersCmd::Status {
            icom,
            shop,
            status,
            rank,
            role,
        } => {
            let request = UpdateMemberStatusRequest {
                rank: rank.map(Into::into),
                status: status.map(Into::into),
                role,
            };
            if request == UpdateMemberStatusRequest::default() {
                return Err(CliError::InvalidInput(
                    "one of --status, --rank or --role is required".into(),
                ));
            }
            print_json(&community.update_member_status(&icom, &shop, &request).await?)
        }
        MembersCmd::Order { icom, shop, order } => {
            let request = UpdateMemberOrderRequest {
                display_order: order,
            };
            print_json(&community.update_member_order(&icom, &shop, &request).await?)
        }
        MembersCmd::Geo {
            icom,
            lat,
            lng,
            radius,
            unit,
        } => {
            let request = GeoSearchRequest {
                lat,
                lng,
                radius,
                unit: unit.into(),
            };
            print_json(&community.geo_search(&icom, &request).await?)
        }
    }
}
